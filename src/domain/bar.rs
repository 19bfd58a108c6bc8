//! Enriched daily bar.
//!
//! The market-data collaborator hands the simulator bars that already carry
//! RSI(14), MACD(12,26,9) with its signal line, the 20-day SMA and the
//! 7-day/63-day volume ratio; the core never computes indicators itself.
//! Indicator columns are optional because the warm-up window of each
//! indicator has no value yet.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub sma20: Option<f64>,
    pub volume_ratio: Option<f64>,
}

impl EnrichedBar {
    /// A bare bar with no indicator columns filled in.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        EnrichedBar {
            date,
            open,
            high,
            low,
            close,
            volume,
            rsi: None,
            macd: None,
            macd_signal: None,
            sma20: None,
            volume_ratio: None,
        }
    }
}
