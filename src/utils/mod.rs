//! 시간 관련 유틸리티
//!
//! 캔들 시간(UNIX 초) 변환 및 포맷팅 함수 제공

pub mod logging;

use chrono::{DateTime, Utc};

/// UNIX 초를 DateTime<Utc>로 변환
pub fn seconds_to_datetime(seconds: i64) -> Option<DateTime<Utc>> {
  DateTime::from_timestamp(seconds, 0)
}

/// UNIX 초를 포맷팅된 문자열로 변환, 범위를 벗어나면 원래 숫자
pub fn format_seconds(seconds: i64, format: &str) -> String {
  match seconds_to_datetime(seconds) {
    Some(dt) => dt.format(format).to_string(),
    None => seconds.to_string(),
  }
}

/// 시간 간격 계산 (초 단위)
pub fn span_days(start: i64, end: i64) -> f64 {
  (end - start) as f64 / 86_400.0
}
