/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/
pub mod moving_averages;
pub mod overlay;
pub mod utils;

pub use moving_averages::*;
pub use overlay::*;
pub use utils::*;

use std::fmt::Debug;

/// Streaming indicator over closing prices.
pub trait Indicator: Debug + Send + Sync {
  fn name(&self) -> &str;

  fn period(&self) -> usize;

  // 새로운 종가로 지표 업데이트
  fn update(&mut self, price: f64);

  // 현재 지표 값, 데이터가 부족하면 None
  fn value(&self) -> Option<f64>;

  fn is_ready(&self) -> bool;

  // 지표 상태 리셋
  fn reset(&mut self);
}
