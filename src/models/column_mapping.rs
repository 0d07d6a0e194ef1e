/**
* filename : column_mapping
* author : HAMA
* date: 2025. 5. 14.
* description:
**/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic column of an OHLC(V) file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnField {
  Date,
  Open,
  High,
  Low,
  Close,
  Volume,
}

impl ColumnField {
  pub const ALL: [ColumnField; 6] = [
    ColumnField::Date,
    ColumnField::Open,
    ColumnField::High,
    ColumnField::Low,
    ColumnField::Close,
    ColumnField::Volume,
  ];

  pub const REQUIRED: [ColumnField; 5] = [
    ColumnField::Date,
    ColumnField::Open,
    ColumnField::High,
    ColumnField::Low,
    ColumnField::Close,
  ];
}

impl fmt::Display for ColumnField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ColumnField::Date => "date",
      ColumnField::Open => "open",
      ColumnField::High => "high",
      ColumnField::Low => "low",
      ColumnField::Close => "close",
      ColumnField::Volume => "volume",
    };
    f.write_str(name)
  }
}

/// Which header holds each semantic field. `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
  pub date: Option<String>,
  pub open: Option<String>,
  pub high: Option<String>,
  pub low: Option<String>,
  pub close: Option<String>,
  pub volume: Option<String>,
}

impl ColumnMapping {
  pub fn get(&self, field: ColumnField) -> Option<&str> {
    let slot = match field {
      ColumnField::Date => &self.date,
      ColumnField::Open => &self.open,
      ColumnField::High => &self.high,
      ColumnField::Low => &self.low,
      ColumnField::Close => &self.close,
      ColumnField::Volume => &self.volume,
    };
    slot.as_deref()
  }

  pub fn set(&mut self, field: ColumnField, header: Option<String>) {
    let slot = match field {
      ColumnField::Date => &mut self.date,
      ColumnField::Open => &mut self.open,
      ColumnField::High => &mut self.high,
      ColumnField::Low => &mut self.low,
      ColumnField::Close => &mut self.close,
      ColumnField::Volume => &mut self.volume,
    };
    // 빈 문자열은 미지정으로 취급
    *slot = header.filter(|h| !h.is_empty());
  }

  /// date/open/high/low/close 가 모두 지정되었는지
  pub fn is_complete(&self) -> bool {
    ColumnField::REQUIRED.iter().all(|f| self.get(*f).is_some())
  }

  pub fn missing_required(&self) -> Vec<ColumnField> {
    ColumnField::REQUIRED
      .iter()
      .copied()
      .filter(|f| self.get(*f).is_none())
      .collect()
  }
}

impl fmt::Display for ColumnMapping {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = ColumnField::ALL
      .iter()
      .map(|field| format!("{}={}", field, self.get(*field).unwrap_or("-")))
      .collect();
    f.write_str(&parts.join(", "))
  }
}
