//! CSV 캔들 차트 라이브러리
//!
//! 임의의 CSV 시세 파일을 정규화된 캔들 시리즈로 변환하고 이동평균 오버레이를 계산합니다.

pub mod chart;
pub mod config;
pub mod error;
pub mod indicators;
pub mod ingest;
pub mod models;
pub mod utils;

// 핵심 타입 재노출
pub use crate::chart::{ChartModel, ChartUpdate, RenderPayload};
pub use crate::error::ChartError;
pub use crate::indicators::{compute_ema, compute_overlays, compute_sma, IndicatorKind, Overlay, OverlaySpec};
pub use crate::ingest::{compile, detect_columns, normalize_number, parse_date_to_seconds, IngestSession};
pub use crate::models::{Candle, CandleSeries, CellValue, ColumnMapping, IndicatorPoint, RawRow};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ChartError>;
