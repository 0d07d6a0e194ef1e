/**
* filename : compiler
* author : HAMA
* date: 2025. 5. 14.
* description: 원시 행 → 정렬된 캔들 시리즈
**/

use serde::Serialize;

use crate::models::{Candle, CandleSeries, ColumnMapping, RawRow};
use super::normalizer::{normalize_number, parse_date_to_seconds};

/// Row accounting for one compilation. Dropped rows are never errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
  pub total_rows: usize,
  pub kept: usize,
  pub bad_date: usize,
  pub bad_price: usize,
  /// 필수 컬럼 미지정으로 컴파일하지 않음
  pub incomplete_mapping: bool,
}

impl CompileReport {
  pub fn dropped(&self) -> usize {
    self.bad_date + self.bad_price
  }
}

/// Builds a time-ordered candle series from raw rows.
///
/// Never fails: an incomplete mapping or an input with no usable rows both
/// produce an empty series.
pub fn compile(rows: &[RawRow], mapping: &ColumnMapping, assume_milliseconds: bool) -> CandleSeries {
  compile_with_report(rows, mapping, assume_milliseconds).0
}

pub fn compile_with_report(
  rows: &[RawRow],
  mapping: &ColumnMapping,
  assume_milliseconds: bool,
) -> (CandleSeries, CompileReport) {
  let mut report = CompileReport {
    total_rows: rows.len(),
    ..CompileReport::default()
  };

  let (date, open, high, low, close) = match (
    mapping.date.as_deref(),
    mapping.open.as_deref(),
    mapping.high.as_deref(),
    mapping.low.as_deref(),
    mapping.close.as_deref(),
  ) {
    (Some(d), Some(o), Some(h), Some(l), Some(c)) => (d, o, h, l, c),
    _ => {
      log::debug!("매핑 불완전, 컴파일 생략: {:?}", mapping.missing_required());
      report.incomplete_mapping = true;
      return (CandleSeries::empty(), report);
    }
  };
  let volume = mapping.volume.as_deref();

  let mut candles = Vec::with_capacity(rows.len());
  for row in rows {
    let time = match parse_date_to_seconds(row.get(date), assume_milliseconds) {
      Some(t) => t,
      None => {
        report.bad_date += 1;
        continue;
      }
    };

    let o = normalize_number(row.get(open));
    let h = normalize_number(row.get(high));
    let l = normalize_number(row.get(low));
    let c = normalize_number(row.get(close));
    if [o, h, l, c].iter().any(|x| x.is_nan()) {
      report.bad_price += 1;
      continue;
    }

    // 거래량은 보조 값: 파싱 실패해도 행은 유지
    let v = volume
      .map(|col| normalize_number(row.get(col)))
      .filter(|x| !x.is_nan());

    candles.push(Candle::new(time, o, h, l, c, v));
  }

  report.kept = candles.len();
  log::debug!(
    "컴파일 완료: 전체 {} / 유지 {} / 날짜 오류 {} / 가격 오류 {}",
    report.total_rows,
    report.kept,
    report.bad_date,
    report.bad_price
  );

  (CandleSeries::from_unsorted(candles), report)
}
