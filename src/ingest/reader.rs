use std::io::Read;
use std::path::Path;

use crate::error::ChartError;
use crate::models::{CellValue, RawRow};

/// Decoded CSV: trimmed header names in file order plus one row per
/// non-empty line.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

pub struct CsvReader {
    delimiter: u8,
}

impl CsvReader {
    pub fn new(delimiter: char) -> Result<Self, ChartError> {
        if !delimiter.is_ascii() {
            return Err(ChartError::InvalidParameter(format!(
                "delimiter must be a single-byte character: {:?}",
                delimiter
            )));
        }
        Ok(Self { delimiter: delimiter as u8 })
    }

    pub fn read_path(&self, path: &Path) -> Result<ParsedCsv, ChartError> {
        let file = std::fs::File::open(path)?;
        let source = path.display().to_string();
        self.read_from(file, &source)
    }

    pub fn read_str(&self, text: &str) -> Result<ParsedCsv, ChartError> {
        self.read_from(text.as_bytes(), "<memory>")
    }

    pub fn read_from<R: Read>(&self, input: R, source: &str) -> Result<ParsedCsv, ChartError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(input);

        let headers = unique_headers(rdr.headers()?.iter());

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let row: RawRow = headers
                .iter()
                .zip(rec.iter())
                .map(|(header, cell)| (header.clone(), CellValue::from(cell)))
                .collect();
            if row.values().all(CellValue::is_blank) {
                continue;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ChartError::EmptyFile(source.to_string()));
        }

        log::info!("CSV 로드 완료: {} - 행 {}개, 컬럼 {}개", source, rows.len(), headers.len());
        Ok(ParsedCsv { headers, rows })
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// File name shown next to the chart, e.g. `BTCUSDT-1m.csv`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// 중복 헤더는 "_1", "_2" 접미사로 구분
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for header in raw {
        let base = header.trim().to_string();
        let mut name = base.clone();
        let mut n = 1;
        while out.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_trimmed_headers() {
        let text = " Date , Open,High,Low,Close\n01/01/2024,1,2,0.5,1.5\n\n02/01/2024,2,3,1.5,2.5\n";
        let parsed = CsvReader::default().read_str(text).unwrap();

        assert_eq!(parsed.headers, vec!["Date", "Open", "High", "Low", "Close"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].get("Close"), Some(&CellValue::from("2.5")));
    }

    #[test]
    fn test_quoted_thousands_and_short_rows() {
        let text = "Date,Close,Volume\n01/01/2024,\"1,234.5\",10\n02/01/2024,7\n,,\n";
        let parsed = CsvReader::default().read_str(text).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].get("Close"), Some(&CellValue::from("1,234.5")));
        assert_eq!(parsed.rows[1].get("Volume"), None);
    }

    #[test]
    fn test_whitespace_only_rows_are_skipped() {
        let parsed = CsvReader::default().read_str("Date,Close\n  , \n01/01/2024,1\n").unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert!(!parsed.rows[0].values().any(CellValue::is_blank));
    }

    #[test]
    fn test_custom_delimiter() {
        let parsed = CsvReader::new(';').unwrap().read_str("a;b\n1;2\n").unwrap();
        assert_eq!(parsed.rows[0].get("b"), Some(&CellValue::from("2")));
    }

    #[test]
    fn test_duplicate_headers() {
        let parsed = CsvReader::default().read_str("Close,Close\n1,2\n").unwrap();
        assert_eq!(parsed.headers, vec!["Close", "Close_1"]);
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let err = CsvReader::default().read_str("Date,Open\n").unwrap_err();
        assert!(matches!(err, ChartError::EmptyFile(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvReader::default()
            .read_path(Path::new("./data/does-not-exist.csv"))
            .unwrap_err();
        assert!(matches!(err, ChartError::IoError(_)));
    }

    #[test]
    fn test_rejects_multibyte_delimiter() {
        assert!(CsvReader::new('₹').is_err());
    }
}
