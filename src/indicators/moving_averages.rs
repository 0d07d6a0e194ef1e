/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::collections::VecDeque;
use crate::error::ChartError;
use crate::models::{Candle, IndicatorPoint};
use super::Indicator;

fn check_period(period: usize) -> Result<(), ChartError> {
  if period == 0 {
    return Err(ChartError::InvalidParameter("period must be a positive integer".to_string()));
  }
  Ok(())
}

#[derive(Debug)]
pub struct SimpleMovingAverage {
  name: String,
  period: usize,
  values: VecDeque<f64>,
  sum: f64,
}

impl SimpleMovingAverage {
  pub fn new(period: usize) -> Result<Self, ChartError> {
    check_period(period)?;
    Ok(SimpleMovingAverage {
      name: format!("SMA-{}", period),
      period,
      values: VecDeque::new(),
      sum: 0.0,
    })
  }
}

impl Indicator for SimpleMovingAverage {
  fn name(&self) -> &str {
    &self.name
  }

  fn period(&self) -> usize {
    self.period
  }

  fn update(&mut self, price: f64) {
    // 새 가격 추가
    self.values.push_back(price);
    self.sum += price;

    // 오래된 가격 제거 (필요시)
    if self.values.len() > self.period {
      if let Some(old_value) = self.values.pop_front() {
        self.sum -= old_value;
      }
    }
  }

  fn value(&self) -> Option<f64> {
    if !self.is_ready() {
      return None;
    }
    Some(self.sum / self.period as f64)
  }

  fn is_ready(&self) -> bool {
    self.values.len() == self.period
  }

  fn reset(&mut self) {
    self.values.clear();
    self.sum = 0.0;
  }
}

#[derive(Debug)]
pub struct ExponentialMovingAverage {
  name: String,
  period: usize,
  alpha: f64,
  seed_sum: f64,
  count: usize,
  current_ema: Option<f64>,
}

impl ExponentialMovingAverage {
  pub fn new(period: usize) -> Result<Self, ChartError> {
    check_period(period)?;
    let alpha = 2.0 / (period as f64 + 1.0);

    Ok(ExponentialMovingAverage {
      name: format!("EMA-{}", period),
      period,
      alpha,
      seed_sum: 0.0,
      count: 0,
      current_ema: None,
    })
  }
}

impl Indicator for ExponentialMovingAverage {
  fn name(&self) -> &str {
    &self.name
  }

  fn period(&self) -> usize {
    self.period
  }

  fn update(&mut self, price: f64) {
    self.count += 1;

    match self.current_ema {
      // EMA 업데이트
      Some(prev_ema) => {
        self.current_ema = Some((price - prev_ema) * self.alpha + prev_ema);
      }
      // EMA 초기화 (처음 period개의 가격으로 SMA 계산)
      None => {
        self.seed_sum += price;
        if self.count == self.period {
          self.current_ema = Some(self.seed_sum / self.period as f64);
        }
      }
    }
  }

  fn value(&self) -> Option<f64> {
    self.current_ema
  }

  fn is_ready(&self) -> bool {
    self.current_ema.is_some()
  }

  fn reset(&mut self) {
    self.seed_sum = 0.0;
    self.current_ema = None;
    self.count = 0;
  }
}

/// Feeds every close through `indicator` and emits a point for each candle
/// once it is ready.
pub fn run_indicator(indicator: &mut dyn Indicator, candles: &[Candle]) -> Vec<IndicatorPoint> {
  let mut points = Vec::with_capacity(candles.len().saturating_sub(indicator.period().saturating_sub(1)));
  for candle in candles {
    indicator.update(candle.close);
    if let Some(value) = indicator.value() {
      points.push(IndicatorPoint { time: candle.time, value });
    }
  }
  log::debug!("{} 계산 완료: 캔들 {}개 → 포인트 {}개", indicator.name(), candles.len(), points.len());
  points
}

/// Simple moving average of closes. The first point lands on the
/// `period`-th candle; `period == 0` is rejected.
pub fn compute_sma(candles: &[Candle], period: usize) -> Result<Vec<IndicatorPoint>, ChartError> {
  let mut sma = SimpleMovingAverage::new(period)?;
  Ok(run_indicator(&mut sma, candles))
}

/// Exponential moving average of closes, seeded with the SMA of the first
/// `period` closes. Fewer candles than `period` gives no points.
pub fn compute_ema(candles: &[Candle], period: usize) -> Result<Vec<IndicatorPoint>, ChartError> {
  let mut ema = ExponentialMovingAverage::new(period)?;
  Ok(run_indicator(&mut ema, candles))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
      .iter()
      .enumerate()
      .map(|(i, c)| Candle::new(i as i64 + 1, *c, *c, *c, *c, None))
      .collect()
  }

  fn assert_points(actual: &[IndicatorPoint], expected: &[(i64, f64)]) {
    assert_eq!(actual.len(), expected.len());
    for (p, (time, value)) in actual.iter().zip(expected) {
      assert_eq!(p.time, *time);
      assert!((p.value - value).abs() < 1e-9, "{} != {}", p.value, value);
    }
  }

  #[test]
  fn test_sma_window() {
    let points = compute_sma(&candles(&[10.0, 11.0, 12.0, 13.0, 14.0]), 3).unwrap();
    assert_points(&points, &[(3, 11.0), (4, 12.0), (5, 13.0)]);
  }

  #[test]
  fn test_ema_reference_vector() {
    let points = compute_ema(&candles(&[10.0, 11.0, 12.0, 13.0, 14.0]), 3).unwrap();
    assert_eq!(
      points,
      vec![
        IndicatorPoint { time: 3, value: 11.0 },
        IndicatorPoint { time: 4, value: 12.0 },
        IndicatorPoint { time: 5, value: 13.0 },
      ]
    );
  }

  #[test]
  fn test_period_one_tracks_closes() {
    let data = candles(&[3.0, 7.0, 5.0]);
    assert_points(&compute_sma(&data, 1).unwrap(), &[(1, 3.0), (2, 7.0), (3, 5.0)]);
    // k = 1 이면 EMA 도 종가 그대로
    assert_points(&compute_ema(&data, 1).unwrap(), &[(1, 3.0), (2, 7.0), (3, 5.0)]);
  }

  #[test]
  fn test_short_and_empty_input() {
    assert!(compute_sma(&candles(&[1.0, 2.0]), 3).unwrap().is_empty());
    assert!(compute_ema(&candles(&[1.0, 2.0]), 3).unwrap().is_empty());
    assert!(compute_sma(&[], 5).unwrap().is_empty());
    assert!(compute_ema(&[], 5).unwrap().is_empty());
  }

  #[test]
  fn test_period_longer_than_series() {
    // 윈도우는 기간 크기만큼 미리 잡지 않음
    let data = candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
    assert!(compute_sma(&data, 1usize << 40).unwrap().is_empty());
    assert!(compute_sma(&data, usize::MAX).unwrap().is_empty());
    assert!(compute_ema(&data, usize::MAX).unwrap().is_empty());
  }

  #[test]
  fn test_indicator_names() {
    assert_eq!(SimpleMovingAverage::new(20).unwrap().name(), "SMA-20");
    assert_eq!(ExponentialMovingAverage::new(9).unwrap().name(), "EMA-9");
  }

  #[test]
  fn test_zero_period_is_rejected() {
    assert!(matches!(compute_sma(&candles(&[1.0]), 0), Err(ChartError::InvalidParameter(_))));
    assert!(matches!(compute_ema(&candles(&[1.0]), 0), Err(ChartError::InvalidParameter(_))));
  }

  #[test]
  fn test_sma_matches_naive_mean() {
    let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
    let points = compute_sma(&candles(&closes), 7).unwrap();

    assert_eq!(points.len(), closes.len() - 7 + 1);
    for (i, p) in points.iter().enumerate() {
      let mean = closes[i..i + 7].iter().sum::<f64>() / 7.0;
      assert!((p.value - mean).abs() < 1e-9);
    }
  }

  #[test]
  fn test_reset_restarts_seed() {
    let mut ema = ExponentialMovingAverage::new(2).unwrap();
    ema.update(1.0);
    ema.update(3.0);
    assert_eq!(ema.value(), Some(2.0));

    ema.reset();
    assert!(!ema.is_ready());
    ema.update(10.0);
    ema.update(20.0);
    assert_eq!(ema.value(), Some(15.0));
  }
}
