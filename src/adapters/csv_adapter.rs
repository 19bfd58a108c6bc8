//! CSV file data adapter.
//!
//! Stands in for the external market-data collaborator. Bars live in one
//! file per instrument (`<CODE>.csv`) with the indicator columns already
//! computed; portfolio/screener snapshots live in a single header-addressed
//! file next to them. Empty cells mean "unknown" and map to `None`.

use crate::domain::bar::EnrichedBar;
use crate::domain::error::StockpilotError;
use crate::domain::snapshot::IndicatorSnapshot;
use crate::ports::data_port::{MarketDataPort, SnapshotRecord};
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const BAR_COLUMNS: usize = 11;

pub struct CsvAdapter {
    base_path: PathBuf,
    snapshot_file: String,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            snapshot_file: "portfolio.csv".to_string(),
        }
    }

    pub fn with_snapshot_file(mut self, name: &str) -> Self {
        self.snapshot_file = name.to_string();
        self
    }

    fn bars_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn data_err(reason: String) -> StockpilotError {
        StockpilotError::Data { reason }
    }
}

fn required_f64(record: &StringRecord, index: usize, name: &str) -> Result<f64, StockpilotError> {
    record
        .get(index)
        .ok_or_else(|| CsvAdapter::data_err(format!("missing {name} column")))?
        .trim()
        .parse()
        .map_err(|e| CsvAdapter::data_err(format!("invalid {name} value: {e}")))
}

fn optional_f64(record: &StringRecord, index: usize, name: &str) -> Result<Option<f64>, StockpilotError> {
    match record.get(index) {
        None => Ok(None),
        Some(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                Ok(None)
            } else {
                raw.parse()
                    .map(Some)
                    .map_err(|e| CsvAdapter::data_err(format!("invalid {name} value: {e}")))
            }
        }
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_bars(&self, code: &str) -> Result<Vec<EnrichedBar>, StockpilotError> {
        let path = self.bars_path(code);
        let content = fs::read_to_string(&path).map_err(|e| {
            Self::data_err(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| Self::data_err(format!("CSV parse error: {e}")))?;

            if record.len() < BAR_COLUMNS {
                return Err(Self::data_err(format!(
                    "expected {} columns, got {}",
                    BAR_COLUMNS,
                    record.len()
                )));
            }

            let date_str = record
                .get(0)
                .ok_or_else(|| Self::data_err("missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| Self::data_err(format!("invalid date format: {e}")))?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| Self::data_err("missing volume column".into()))?
                .trim()
                .parse()
                .map_err(|e| Self::data_err(format!("invalid volume value: {e}")))?;

            bars.push(EnrichedBar {
                date,
                open: required_f64(&record, 1, "open")?,
                high: required_f64(&record, 2, "high")?,
                low: required_f64(&record, 3, "low")?,
                close: required_f64(&record, 4, "close")?,
                volume,
                rsi: optional_f64(&record, 6, "rsi")?,
                macd: optional_f64(&record, 7, "macd")?,
                macd_signal: optional_f64(&record, 8, "macd_signal")?,
                sma20: optional_f64(&record, 9, "sma20")?,
                volume_ratio: optional_f64(&record, 10, "volume_ratio")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockpilotError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            Self::data_err(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::data_err(format!("directory entry error: {e}")))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                if code != self.snapshot_file.trim_end_matches(".csv") {
                    symbols.push(code.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn fetch_snapshots(&self) -> Result<Vec<SnapshotRecord>, StockpilotError> {
        let path = self.base_path.join(&self.snapshot_file);
        let content = fs::read_to_string(&path).map_err(|e| {
            Self::data_err(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| Self::data_err(format!("CSV header error: {e}")))?;
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let ticker_idx = *columns
            .get("ticker")
            .ok_or_else(|| Self::data_err("snapshot file has no ticker column".into()))?;

        let field = |record: &StringRecord, name: &str| -> Result<Option<f64>, StockpilotError> {
            match columns.get(name) {
                None => Ok(None),
                Some(&idx) => optional_f64(record, idx, name),
            }
        };
        let text = |record: &StringRecord, name: &str| -> Option<String> {
            columns
                .get(name)
                .and_then(|&idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| Self::data_err(format!("CSV parse error: {e}")))?;

            let ticker = record
                .get(ticker_idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Self::data_err("snapshot row has empty ticker".into()))?
                .to_uppercase();

            let snapshot = IndicatorSnapshot {
                price: field(&record, "price")?,
                price_prev: field(&record, "price_prev")?,
                rsi: field(&record, "rsi")?,
                rsi_prev: field(&record, "rsi_prev")?,
                macd: field(&record, "macd")?,
                macd_signal: field(&record, "macd_signal")?,
                macd_prev: field(&record, "macd_prev")?,
                macd_signal_prev: field(&record, "macd_signal_prev")?,
                ma20: field(&record, "ma20")?,
                ma50: field(&record, "ma50")?,
                ma200: field(&record, "ma200")?,
                high_52w: field(&record, "high_52w")?,
                volume_ratio: field(&record, "volume_ratio")?,
                day_change_pct: field(&record, "day_change_pct")?,
                pe_ratio: field(&record, "pe_ratio")?,
                pb_ratio: field(&record, "pb_ratio")?,
                ps_ratio: field(&record, "ps_ratio")?,
                debt_equity: field(&record, "debt_equity")?,
                profit_margin: field(&record, "profit_margin")?,
                return_on_equity: field(&record, "return_on_equity")?,
                beta: field(&record, "beta")?,
                target_price: field(&record, "target_price")?,
                upside: field(&record, "upside")?,
                sector: text(&record, "sector"),
                region: text(&record, "region"),
            };

            records.push(SnapshotRecord {
                ticker,
                position_value: field(&record, "position_value")?.unwrap_or(0.0),
                snapshot,
            });
        }

        Ok(records)
    }
}
