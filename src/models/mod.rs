pub mod candle;
pub mod column_mapping;
pub mod raw_row;

pub use candle::{Candle, CandleSeries, IndicatorPoint};
pub use column_mapping::{ColumnField, ColumnMapping};
pub use raw_row::{CellValue, RawRow};
