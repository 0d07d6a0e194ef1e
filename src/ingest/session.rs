/**
* filename : session
* author : HAMA
* date: 2025. 5. 15.
* description: 업로드 단위 상태 관리 (로드 순번, 매핑, 현재 시리즈)
**/

use std::path::Path;

use crate::error::ChartError;
use crate::models::{CandleSeries, ColumnField, ColumnMapping, RawRow};
use super::column_mapper::{suggest_columns, ColumnSuggestion};
use super::compiler::{compile_with_report, CompileReport};
use super::reader::{display_name, CsvReader, ParsedCsv};

pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Issued when a load starts. Only the most recently issued ticket can
/// replace the session's data.
#[derive(Debug)]
pub struct LoadTicket {
  seq: u64,
  file_name: String,
}

impl LoadTicket {
  pub fn seq(&self) -> u64 {
    self.seq
  }

  pub fn file_name(&self) -> &str {
    &self.file_name
  }
}

#[derive(Debug)]
pub enum LoadOutcome {
  /// A newer load (or a clear) was started after this one; nothing changed.
  Stale,
  /// Auto-detection was incomplete or relied on bare-letter matches. The
  /// session keeps the rows and the suggested mapping, and the series is empty
  /// until [`IngestSession::apply_mapping`] runs.
  NeedsMapping(ColumnSuggestion),
  Compiled {
    series: CandleSeries,
    report: CompileReport,
  },
}

#[derive(Debug)]
pub struct IngestSession {
  assume_milliseconds: bool,
  preview_rows: usize,
  latest_seq: u64,
  file_name: Option<String>,
  headers: Vec<String>,
  rows: Vec<RawRow>,
  mapping: ColumnMapping,
  suggestion: Option<ColumnSuggestion>,
  series: CandleSeries,
  last_report: Option<CompileReport>,
}

impl IngestSession {
  pub fn new(assume_milliseconds: bool) -> Self {
    IngestSession {
      assume_milliseconds,
      preview_rows: DEFAULT_PREVIEW_ROWS,
      latest_seq: 0,
      file_name: None,
      headers: Vec::new(),
      rows: Vec::new(),
      mapping: ColumnMapping::default(),
      suggestion: None,
      series: CandleSeries::empty(),
      last_report: None,
    }
  }

  pub fn with_preview_rows(mut self, n: usize) -> Self {
    self.preview_rows = n;
    self
  }

  pub fn begin_load(&mut self, file_name: impl Into<String>) -> LoadTicket {
    self.latest_seq += 1;
    LoadTicket {
      seq: self.latest_seq,
      file_name: file_name.into(),
    }
  }

  pub fn is_latest(&self, ticket: &LoadTicket) -> bool {
    ticket.seq == self.latest_seq
  }

  /// Completes a load started with [`begin_load`](Self::begin_load).
  ///
  /// A decoding error is returned to the caller only when the ticket is still
  /// current; stale results are dropped regardless of their content.
  pub fn finish_load(
    &mut self,
    ticket: LoadTicket,
    parsed: Result<ParsedCsv, ChartError>,
  ) -> Result<LoadOutcome, ChartError> {
    if !self.is_latest(&ticket) {
      log::info!("오래된 로드 결과 폐기: #{} ({}), 최신 #{}", ticket.seq, ticket.file_name, self.latest_seq);
      return Ok(LoadOutcome::Stale);
    }

    let parsed = parsed.map_err(|e| {
      log::error!("CSV 파싱 실패 - {}: {}", ticket.file_name, e);
      e
    })?;

    let suggestion = suggest_columns(&parsed.headers);
    log::info!("자동 매핑: {}", suggestion.mapping);

    self.file_name = Some(ticket.file_name);
    self.headers = parsed.headers;
    self.rows = parsed.rows;
    self.mapping = suggestion.mapping.clone();
    self.suggestion = Some(suggestion.clone());

    if suggestion.needs_confirmation() {
      log::warn!(
        "매핑 확인 필요 - 누락: {:?}, 한 글자 매칭: {:?}",
        suggestion.mapping.missing_required(),
        suggestion.weak_fields()
      );
      self.series = CandleSeries::empty();
      self.last_report = None;
      return Ok(LoadOutcome::NeedsMapping(suggestion));
    }

    let report = self.recompile();
    Ok(LoadOutcome::Compiled {
      series: self.series.clone(),
      report,
    })
  }

  /// Reads and loads a file synchronously.
  pub fn load_path(&mut self, path: &Path, reader: &CsvReader) -> Result<LoadOutcome, ChartError> {
    let ticket = self.begin_load(display_name(path));
    let parsed = reader.read_path(path);
    self.finish_load(ticket, parsed)
  }

  pub fn set_mapping(&mut self, mapping: ColumnMapping) {
    self.mapping = mapping;
  }

  pub fn set_field(&mut self, field: ColumnField, header: Option<String>) {
    self.mapping.set(field, header);
  }

  /// Takes effect on the next [`apply_mapping`](Self::apply_mapping).
  pub fn set_assume_milliseconds(&mut self, value: bool) {
    self.assume_milliseconds = value;
  }

  /// Recompiles the loaded rows with the current mapping and replaces the
  /// series.
  pub fn apply_mapping(&mut self) -> CandleSeries {
    self.recompile();
    self.series.clone()
  }

  /// Drops all loaded data. Loads still in flight become stale.
  pub fn clear(&mut self) {
    self.latest_seq += 1;
    self.file_name = None;
    self.headers.clear();
    self.rows.clear();
    self.mapping = ColumnMapping::default();
    self.suggestion = None;
    self.series = CandleSeries::empty();
    self.last_report = None;
  }

  fn recompile(&mut self) -> CompileReport {
    let (series, report) = compile_with_report(&self.rows, &self.mapping, self.assume_milliseconds);
    log::info!(
      "캔들 {}개 생성 (입력 {}행, 제외 {}행)",
      report.kept,
      report.total_rows,
      report.dropped()
    );
    self.series = series;
    self.last_report = Some(report);
    report
  }

  pub fn file_name(&self) -> Option<&str> {
    self.file_name.as_deref()
  }

  pub fn headers(&self) -> &[String] {
    &self.headers
  }

  pub fn preview(&self) -> &[RawRow] {
    &self.rows[..self.rows.len().min(self.preview_rows)]
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn mapping(&self) -> &ColumnMapping {
    &self.mapping
  }

  pub fn suggestion(&self) -> Option<&ColumnSuggestion> {
    self.suggestion.as_ref()
  }

  pub fn assume_milliseconds(&self) -> bool {
    self.assume_milliseconds
  }

  pub fn series(&self) -> &CandleSeries {
    &self.series
  }

  pub fn last_report(&self) -> Option<&CompileReport> {
    self.last_report.as_ref()
  }
}

impl Default for IngestSession {
  fn default() -> Self {
    IngestSession::new(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const GOOD: &str = "Date,Open,High,Low,Close,Volume\n\
                      02/01/2024,2,3,1,2.5,100\n\
                      01/01/2024,1,2,0.5,1.5,50\n";

  const AMBIGUOUS: &str = "Symbol,Date,Open,High,Low,Close\n\
                           ABC,01/01/2024,1,2,0.5,1.5\n";

  fn parse(text: &str) -> Result<ParsedCsv, ChartError> {
    CsvReader::default().read_str(text)
  }

  #[test]
  fn test_auto_compiles_confident_mapping() {
    let mut session = IngestSession::default();
    let ticket = session.begin_load("good.csv");

    match session.finish_load(ticket, parse(GOOD)).unwrap() {
      LoadOutcome::Compiled { series, report } => {
        assert_eq!(series.len(), 2);
        assert_eq!(report.kept, 2);
        assert!(series[0].time < series[1].time);
      }
      other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(session.file_name(), Some("good.csv"));
    assert_eq!(session.series().len(), 2);
  }

  #[test]
  fn test_stale_load_is_discarded() {
    let mut session = IngestSession::default();
    let slow = session.begin_load("slow.csv");
    let fast = session.begin_load("fast.csv");

    session.finish_load(fast, parse(GOOD)).unwrap();
    let outcome = session.finish_load(slow, parse(AMBIGUOUS)).unwrap();

    assert!(matches!(outcome, LoadOutcome::Stale));
    assert_eq!(session.file_name(), Some("fast.csv"));
    assert_eq!(session.series().len(), 2);
  }

  #[test]
  fn test_stale_error_is_not_reported() {
    let mut session = IngestSession::default();
    let old = session.begin_load("old.csv");
    let _new = session.begin_load("new.csv");

    let outcome = session.finish_load(old, parse("Date\n")).unwrap();
    assert!(matches!(outcome, LoadOutcome::Stale));
  }

  #[test]
  fn test_current_error_is_propagated() {
    let mut session = IngestSession::default();
    let ticket = session.begin_load("empty.csv");
    let err = session.finish_load(ticket, parse("Date,Open\n")).unwrap_err();
    assert!(matches!(err, ChartError::EmptyFile(_)));
  }

  #[test]
  fn test_weak_mapping_waits_for_confirmation() {
    let mut session = IngestSession::default();
    let ticket = session.begin_load("ambiguous.csv");

    let outcome = session.finish_load(ticket, parse(AMBIGUOUS)).unwrap();
    let suggestion = match outcome {
      LoadOutcome::NeedsMapping(s) => s,
      other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(suggestion.mapping.open.as_deref(), Some("Symbol"));
    assert!(session.series().is_empty());

    // 사용자 수동 지정
    session.set_field(ColumnField::Open, Some("Open".into()));
    session.set_field(ColumnField::Low, Some("Low".into()));
    let series = session.apply_mapping();

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].open, 1.0);
    assert_eq!(series[0].low, 0.5);
  }

  #[test]
  fn test_apply_mapping_respects_ms_flag() {
    let mut session = IngestSession::default();
    let ticket = session.begin_load("epoch.csv");
    let text = "time,open,high,low,close\n1706659200,1,1,1,1\n";
    session.finish_load(ticket, parse(text)).unwrap();
    assert_eq!(session.series()[0].time, 1_706_659_200);

    session.set_assume_milliseconds(true);
    assert_eq!(session.apply_mapping()[0].time, 1_706_659);
  }

  #[test]
  fn test_clear_resets_and_invalidates_in_flight() {
    let mut session = IngestSession::default();
    let ticket = session.begin_load("good.csv");
    session.finish_load(ticket, parse(GOOD)).unwrap();

    let pending = session.begin_load("pending.csv");
    session.clear();

    assert!(session.series().is_empty());
    assert!(session.headers().is_empty());
    assert_eq!(session.file_name(), None);
    assert!(matches!(session.finish_load(pending, parse(GOOD)).unwrap(), LoadOutcome::Stale));
  }

  #[test]
  fn test_preview_is_capped() {
    let mut text = String::from("Date,Open,High,Low,Close\n");
    for day in 1..=15 {
      text.push_str(&format!("{:02}/01/2024,1,1,1,1\n", day));
    }

    let mut session = IngestSession::default().with_preview_rows(4);
    let ticket = session.begin_load("long.csv");
    session.finish_load(ticket, parse(&text)).unwrap();

    assert_eq!(session.row_count(), 15);
    assert_eq!(session.preview().len(), 4);
  }
}
