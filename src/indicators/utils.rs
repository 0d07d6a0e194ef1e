/**
* filename : utils
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use crate::models::{Candle, IndicatorPoint};
use super::Indicator;

// 단일 종가로 여러 지표 업데이트
pub fn update_indicators(indicators: &mut [Box<dyn Indicator>], price: f64) {
  for indicator in indicators.iter_mut() {
    indicator.update(price);
  }
}

// 캔들 시리즈 한 번 순회로 모든 지표 계산
pub fn run_indicators(indicators: &mut [Box<dyn Indicator>], candles: &[Candle]) -> Vec<Vec<IndicatorPoint>> {
  let mut outputs: Vec<Vec<IndicatorPoint>> = indicators.iter().map(|_| Vec::new()).collect();

  for candle in candles {
    update_indicators(indicators, candle.close);
    for (indicator, points) in indicators.iter().zip(outputs.iter_mut()) {
      if let Some(value) = indicator.value() {
        points.push(IndicatorPoint { time: candle.time, value });
      }
    }
  }

  outputs
}
