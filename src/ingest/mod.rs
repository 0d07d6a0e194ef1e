/**
* filename : mod
* author : HAMA
* date: 2025. 5. 14.
* description:
**/
pub mod column_mapper;
pub mod compiler;
pub mod normalizer;
pub mod reader;
pub mod session;

pub use column_mapper::{detect_columns, suggest_columns, ColumnSuggestion, MatchConfidence};
pub use compiler::{compile, compile_with_report, CompileReport};
pub use normalizer::{normalize_number, parse_date_to_seconds};
pub use reader::{CsvReader, ParsedCsv};
pub use session::{IngestSession, LoadOutcome, LoadTicket};
