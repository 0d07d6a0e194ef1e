use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

/// One OHLC(V) interval. `time` is UNIX seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: Option<f64>) -> Self {
        Candle {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Derived overlay value aligned to a candle's time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub time: i64,
    pub value: f64,
}

/// Immutable, time-ordered candle sequence.
///
/// Cloning shares the underlying buffer, so two clones are the "same" series
/// for change detection (see [`CandleSeries::same_as`]). Loading new data
/// always produces a new buffer.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: Arc<[Candle]>,
}

impl CandleSeries {
    pub fn empty() -> Self {
        CandleSeries {
            candles: Arc::from(Vec::new()),
        }
    }

    /// Sorts ascending by time. The sort is stable so equal timestamps keep
    /// their input order.
    pub fn from_unsorted(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.time);
        CandleSeries {
            candles: Arc::from(candles),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.candles.iter().map(|c| c.close)
    }

    pub fn first_time(&self) -> Option<i64> {
        self.candles.first().map(|c| c.time)
    }

    pub fn last_time(&self) -> Option<i64> {
        self.candles.last().map(|c| c.time)
    }

    /// Identity comparison: true only for clones of the same loaded series.
    pub fn same_as(&self, other: &CandleSeries) -> bool {
        Arc::ptr_eq(&self.candles, &other.candles)
    }
}

impl Default for CandleSeries {
    fn default() -> Self {
        CandleSeries::empty()
    }
}

impl Deref for CandleSeries {
    type Target = [Candle];

    fn deref(&self) -> &[Candle] {
        &self.candles
    }
}

impl PartialEq for CandleSeries {
    fn eq(&self, other: &Self) -> bool {
        self.candles[..] == other.candles[..]
    }
}

impl Serialize for CandleSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.candles.iter())
    }
}
