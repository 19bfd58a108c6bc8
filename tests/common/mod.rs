#![allow(dead_code)]

use chrono::NaiveDate;
pub use stockpilot::domain::bar::EnrichedBar;
use stockpilot::domain::error::StockpilotError;
pub use stockpilot::domain::signal::SignalThresholds;
pub use stockpilot::domain::simulator::SimulationParams;
use stockpilot::domain::snapshot::IndicatorSnapshot;
use stockpilot::ports::data_port::{MarketDataPort, SnapshotRecord};
use std::collections::HashMap;

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

/// A bar with flat indicators: RSI parked mid-band, MACD glued to its
/// signal line, the 20-day MA far above price, ordinary volume. Nothing
/// crosses anything.
pub fn neutral_bar(day: u32, close: f64) -> EnrichedBar {
    EnrichedBar {
        date: date(day),
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1000,
        rsi: Some(50.0),
        macd: Some(0.0),
        macd_signal: Some(0.0),
        sma20: Some(close + 10.0),
        volume_ratio: Some(1.0),
    }
}

/// RSI parked just under the oversold line, ready for a bullish cross on
/// the next bar.
pub fn oversold_bar(day: u32, close: f64) -> EnrichedBar {
    EnrichedBar {
        rsi: Some(28.0),
        ..neutral_bar(day, close)
    }
}

/// Two bullish reasons (RSI cross out of oversold, high volume) when it
/// follows an [`oversold_bar`]: grades Buy.
pub fn buy_bar(day: u32, close: f64) -> EnrichedBar {
    EnrichedBar {
        rsi: Some(32.0),
        volume_ratio: Some(2.0),
        ..neutral_bar(day, close)
    }
}

/// RSI above overbought and MACD above its signal line; the setup a
/// [`sell_bar`] needs on its predecessor.
pub fn overbought_bar(day: u32, close: f64) -> EnrichedBar {
    EnrichedBar {
        rsi: Some(71.0),
        macd: Some(0.5),
        macd_signal: Some(0.0),
        ..neutral_bar(day, close)
    }
}

/// Bearish RSI and MACD crosses when it follows an [`overbought_bar`]:
/// grades Sell.
pub fn sell_bar(day: u32, close: f64) -> EnrichedBar {
    EnrichedBar {
        rsi: Some(65.0),
        macd: Some(-0.5),
        macd_signal: Some(0.0),
        ..neutral_bar(day, close)
    }
}

/// Wide stops and targets plus zero delay: only signals drive the run.
pub fn signal_only_params() -> SimulationParams {
    SimulationParams {
        signal_delay: 0,
        stop_loss_pct: 0.5,
        take_profit_pct: 0.5,
        ..SimulationParams::default()
    }
}

/// A snapshot that clears every buy check under the default profile.
pub fn strong_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        price: Some(100.0),
        ma50: Some(90.0),
        ma200: Some(80.0),
        high_52w: Some(105.0),
        volume_ratio: Some(1.5),
        day_change_pct: Some(0.8),
        pe_ratio: Some(15.0),
        pb_ratio: Some(1.8),
        ps_ratio: Some(2.0),
        debt_equity: Some(0.5),
        profit_margin: Some(0.20),
        return_on_equity: Some(0.25),
        beta: Some(0.9),
        target_price: Some(140.0),
        upside: Some(0.40),
        ..Default::default()
    }
}

pub struct MockDataPort {
    pub bars: HashMap<String, Vec<EnrichedBar>>,
    pub snapshots: Vec<SnapshotRecord>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<EnrichedBar>) -> Self {
        self.bars.insert(code.to_string(), bars);
        self
    }

    pub fn with_snapshot(mut self, ticker: &str, position_value: f64, snapshot: IndicatorSnapshot) -> Self {
        self.snapshots.push(SnapshotRecord {
            ticker: ticker.to_string(),
            position_value,
            snapshot,
        });
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_bars(&self, code: &str) -> Result<Vec<EnrichedBar>, StockpilotError> {
        self.bars
            .get(code)
            .cloned()
            .ok_or_else(|| StockpilotError::NoData {
                code: code.to_string(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockpilotError> {
        let mut symbols: Vec<String> = self.bars.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn fetch_snapshots(&self) -> Result<Vec<SnapshotRecord>, StockpilotError> {
        Ok(self.snapshots.clone())
    }
}
