/**
* filename : column_mapper
* author : HAMA
* date: 2025. 5. 14.
* description: 헤더 이름으로 OHLCV 컬럼 추정
**/

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ColumnField, ColumnMapping};

/// How a suggested header was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
  /// A multi-letter keyword ("close", "vol") or a header that is exactly the
  /// single-letter abbreviation ("C").
  Word,
  /// Only a bare letter somewhere inside the header ("Country" for close).
  Letter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSuggestion {
  pub mapping: ColumnMapping,
  pub confidence: HashMap<ColumnField, MatchConfidence>,
}

impl ColumnSuggestion {
  pub fn confidence_of(&self, field: ColumnField) -> Option<MatchConfidence> {
    self.confidence.get(&field).copied()
  }

  /// Required fields that were only matched on a bare letter.
  pub fn weak_fields(&self) -> Vec<ColumnField> {
    ColumnField::REQUIRED
      .iter()
      .copied()
      .filter(|f| self.confidence_of(*f) == Some(MatchConfidence::Letter))
      .collect()
  }

  /// 필수 컬럼이 비어 있거나 한 글자 매칭뿐이면 사용자 확인 필요
  pub fn needs_confirmation(&self) -> bool {
    !self.mapping.is_complete() || !self.weak_fields().is_empty()
  }

  /// Required fields that are still missing or bare-letter matched once the
  /// caller has explicitly chosen headers for `overridden`.
  pub fn unresolved_fields(&self, overridden: &[ColumnField]) -> Vec<ColumnField> {
    let mut fields = self.mapping.missing_required();
    fields.extend(self.weak_fields());
    fields.retain(|f| !overridden.contains(f));
    fields.sort_by_key(|f| ColumnField::REQUIRED.iter().position(|r| r == f));
    fields
  }
}

fn candidates(field: ColumnField) -> &'static [&'static str] {
  match field {
    ColumnField::Date => &["timestamp", "date", "time"],
    ColumnField::Open => &["open", "o"],
    ColumnField::High => &["high", "h"],
    ColumnField::Low => &["low", "l"],
    ColumnField::Close => &["close", "c", "last"],
    ColumnField::Volume => &["volume", "vol", "v"],
  }
}

fn find_header<'a>(headers: &'a [String], field: ColumnField) -> Option<(&'a str, MatchConfidence)> {
  let cands = candidates(field);
  let header = headers.iter().find(|h| {
    let lower = h.to_lowercase();
    cands.iter().any(|c| lower.contains(c))
  })?;

  let lower = header.to_lowercase();
  let confidence = if cands
    .iter()
    .any(|c| (c.len() > 1 && lower.contains(c)) || lower.trim() == *c)
  {
    MatchConfidence::Word
  } else {
    MatchConfidence::Letter
  };
  Some((header.as_str(), confidence))
}

/// Guesses the date/OHLC/volume columns from header names.
///
/// For each field the first header (in header order) whose lowercase form
/// contains one of the field's keywords wins. Single-letter keywords make this
/// a heuristic: the same header may be picked for several fields, and
/// unrelated headers can match. Callers must allow a manual override.
pub fn detect_columns(headers: &[String]) -> ColumnMapping {
  suggest_columns(headers).mapping
}

pub fn suggest_columns(headers: &[String]) -> ColumnSuggestion {
  let mut mapping = ColumnMapping::default();
  let mut confidence = HashMap::new();

  for field in ColumnField::ALL {
    if let Some((header, conf)) = find_header(headers, field) {
      mapping.set(field, Some(header.to_string()));
      confidence.insert(field, conf);
    }
  }

  log::debug!("컬럼 자동 감지: {}", mapping);
  ColumnSuggestion { mapping, confidence }
}
