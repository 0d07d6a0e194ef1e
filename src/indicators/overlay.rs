//! 차트 오버레이 정의
//!
//! SMA/EMA 오버레이를 `{종류, 기간}` 목록 하나로 일반화합니다.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::models::{Candle, IndicatorPoint};
use super::moving_averages::{ExponentialMovingAverage, SimpleMovingAverage};
use super::utils::run_indicators;
use super::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
  Sma,
  Ema,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlaySpec {
  pub name: String,
  pub kind: IndicatorKind,
  pub period: usize,
}

impl OverlaySpec {
  pub fn new(name: impl Into<String>, kind: IndicatorKind, period: usize) -> Self {
    OverlaySpec {
      name: name.into(),
      kind,
      period,
    }
  }

  pub fn sma(period: usize) -> Self {
    OverlaySpec::new(format!("SMA-{}", period), IndicatorKind::Sma, period)
  }

  pub fn ema(period: usize) -> Self {
    OverlaySpec::new(format!("EMA-{}", period), IndicatorKind::Ema, period)
  }

  pub fn validate(&self) -> Result<(), ChartError> {
    if self.name.trim().is_empty() {
      return Err(ChartError::InvalidParameter("overlay name must not be empty".to_string()));
    }
    if self.period == 0 {
      return Err(ChartError::InvalidParameter(format!(
        "overlay {}: period must be a positive integer",
        self.name
      )));
    }
    Ok(())
  }

  pub fn build(&self) -> Result<Box<dyn Indicator>, ChartError> {
    self.validate()?;
    let indicator: Box<dyn Indicator> = match self.kind {
      IndicatorKind::Sma => Box::new(SimpleMovingAverage::new(self.period)?),
      IndicatorKind::Ema => Box::new(ExponentialMovingAverage::new(self.period)?),
    };
    Ok(indicator)
  }
}

/// One computed line series, named after its spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
  pub name: String,
  pub kind: IndicatorKind,
  pub period: usize,
  pub points: Vec<IndicatorPoint>,
}

impl Overlay {
  pub fn last_value(&self) -> Option<f64> {
    self.points.last().map(|p| p.value)
  }

  /// Value at exactly `time`, for crosshair legends.
  pub fn value_at(&self, time: i64) -> Option<f64> {
    self.points
      .binary_search_by_key(&time, |p| p.time)
      .ok()
      .map(|i| self.points[i].value)
  }
}

/// Recomputes every overlay over the full series in a single pass.
///
/// Every spec is validated before any work starts, so a bad period fails the
/// whole call instead of yielding a partial set.
pub fn compute_overlays(candles: &[Candle], specs: &[OverlaySpec]) -> Result<Vec<Overlay>, ChartError> {
  let mut indicators = specs.iter().map(|s| s.build()).collect::<Result<Vec<_>, _>>()?;
  let outputs = run_indicators(&mut indicators, candles);

  Ok(
    specs
      .iter()
      .zip(outputs)
      .map(|(spec, points)| Overlay {
        name: spec.name.clone(),
        kind: spec.kind,
        period: spec.period,
        points,
      })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::indicators::{compute_ema, compute_sma};

  fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
      .iter()
      .enumerate()
      .map(|(i, c)| Candle::new((i as i64 + 1) * 60, *c, *c, *c, *c, None))
      .collect()
  }

  #[test]
  fn test_overlays_match_single_indicator_functions() {
    let data = candles(&[5.0, 6.0, 7.0, 6.5, 8.0, 9.5, 9.0, 10.0]);
    let specs = vec![OverlaySpec::sma(3), OverlaySpec::ema(2), OverlaySpec::ema(5)];

    let overlays = compute_overlays(&data, &specs).unwrap();

    assert_eq!(overlays.len(), 3);
    assert_eq!(overlays[0].name, "SMA-3");
    assert_eq!(overlays[0].points, compute_sma(&data, 3).unwrap());
    assert_eq!(overlays[1].points, compute_ema(&data, 2).unwrap());
    assert_eq!(overlays[2].points, compute_ema(&data, 5).unwrap());
  }

  #[test]
  fn test_invalid_spec_fails_whole_set() {
    let data = candles(&[1.0, 2.0]);
    let specs = vec![OverlaySpec::sma(1), OverlaySpec::new("broken", IndicatorKind::Ema, 0)];
    assert!(matches!(compute_overlays(&data, &specs), Err(ChartError::InvalidParameter(_))));

    let unnamed = vec![OverlaySpec::new(" ", IndicatorKind::Sma, 2)];
    assert!(compute_overlays(&data, &unnamed).is_err());
  }

  #[test]
  fn test_value_lookup() {
    let data = candles(&[1.0, 2.0, 3.0]);
    let overlays = compute_overlays(&data, &[OverlaySpec::sma(2)]).unwrap();
    let sma = &overlays[0];

    assert_eq!(sma.value_at(60), None);
    assert_eq!(sma.value_at(120), Some(1.5));
    assert_eq!(sma.last_value(), Some(2.5));
  }

  #[test]
  fn test_spec_serde_shape() {
    let spec: OverlaySpec = serde_json::from_str(r#"{"name":"fast","kind":"ema","period":9}"#).unwrap();
    assert_eq!(spec, OverlaySpec::new("fast", IndicatorKind::Ema, 9));
  }
}
