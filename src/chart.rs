//! 차트 상태 모델
//!
//! 렌더러에 넘길 캔들 시리즈와 오버레이를 보관하고, 무엇이 바뀌었는지 알려 줍니다.
//! 시리즈가 교체되면 화면(줌/스크롤)을 초기화하고, 지표 설정만 바뀌면 오버레이만 다시 그립니다.

use serde::Serialize;

use crate::error::ChartError;
use crate::indicators::{compute_overlays, Overlay, OverlaySpec};
use crate::models::{Candle, CandleSeries};

/// What the renderer has to redo after a model change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartUpdate {
    pub candles_changed: bool,
    pub overlays_changed: bool,
    /// Fit the time axis to the new data.
    pub reset_view: bool,
}

impl ChartUpdate {
    pub fn is_noop(&self) -> bool {
        !self.candles_changed && !self.overlays_changed && !self.reset_view
    }
}

/// Everything the renderer draws, with `time` in UNIX seconds on both sides.
#[derive(Debug, Serialize)]
pub struct RenderPayload<'a> {
    pub candles: &'a [Candle],
    pub overlays: &'a [Overlay],
}

#[derive(Debug)]
pub struct ChartModel {
    series: CandleSeries,
    specs: Vec<OverlaySpec>,
    overlays: Vec<Overlay>,
}

impl ChartModel {
    pub fn new(specs: Vec<OverlaySpec>) -> Result<Self, ChartError> {
        let series = CandleSeries::empty();
        let overlays = compute_overlays(&series, &specs)?;
        Ok(ChartModel { series, specs, overlays })
    }

    /// Replaces the candle data. Handing back a clone of the current series
    /// is a no-op.
    pub fn set_series(&mut self, series: CandleSeries) -> Result<ChartUpdate, ChartError> {
        if series.same_as(&self.series) {
            return Ok(ChartUpdate::default());
        }

        let overlays = compute_overlays(&series, &self.specs)?;
        log::debug!("시리즈 교체: 캔들 {}개, 오버레이 {}개 재계산", series.len(), overlays.len());

        let reset_view = !series.is_empty();
        self.series = series;
        self.overlays = overlays;
        Ok(ChartUpdate {
            candles_changed: true,
            overlays_changed: true,
            reset_view,
        })
    }

    /// Changes the overlay set. The view is left alone. On error the model
    /// keeps its previous overlays.
    pub fn set_overlays(&mut self, specs: Vec<OverlaySpec>) -> Result<ChartUpdate, ChartError> {
        if specs == self.specs {
            return Ok(ChartUpdate::default());
        }

        let overlays = compute_overlays(&self.series, &specs)?;
        log::debug!("오버레이 재계산: {:?}", specs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>());

        self.specs = specs;
        self.overlays = overlays;
        Ok(ChartUpdate {
            overlays_changed: true,
            ..ChartUpdate::default()
        })
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn specs(&self) -> &[OverlaySpec] {
        &self.specs
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, name: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.name == name)
    }

    pub fn payload(&self) -> RenderPayload<'_> {
        RenderPayload {
            candles: &self.series,
            overlays: &self.overlays,
        }
    }
}
