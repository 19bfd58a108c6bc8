//! Backtest simulator.
//!
//! Replays the signal classifier over an enriched bar sequence and manages
//! a single long/short position slot with stop-loss, take-profit and
//! per-leg transaction costs.
//!
//! # Event order per bar
//!
//! 1. With an open position: stop-loss, then take-profit, then the
//!    effective (lagged) signal. The first trigger closes the position at
//!    its own price (the stop/target price, not the bar extreme) and the
//!    bar is done — a close never re-enters on the same bar.
//! 2. Flat: an effective buy grade opens a long, an effective sell grade
//!    opens a short, both at the bar close.
//!
//! Transaction cost leaves capital at every open and every close, so a
//! round trip pays twice. Capital moves only on those events; open
//! positions are not marked to market between bars. Whatever is still open
//! after the last bar force-closes at that bar's close.

use crate::domain::bar::EnrichedBar;
use crate::domain::error::StockpilotError;
use crate::domain::position::{Direction, ExitReason, Position, Trade};
use crate::domain::signal::{classify, SignalThresholds, TechnicalSignal};
use crate::domain::snapshot::IndicatorSnapshot;
use crate::domain::stats::TradeStats;

/// Strategy parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub start_capital: f64,
    /// Flat cost per leg, charged at entry and again at exit.
    pub transaction_cost: f64,
    /// Bars between a signal firing and the order acting on it.
    pub signal_delay: usize,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub thresholds: SignalThresholds,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            start_capital: 10_000.0,
            transaction_cost: 5.0,
            signal_delay: 1,
            stop_loss_pct: 0.05,
            take_profit_pct: 0.10,
            thresholds: SignalThresholds::default(),
        }
    }
}

/// Outcome of one simulation run. Owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub start_capital: f64,
    pub final_capital: f64,
    pub return_pct: f64,
    pub trades: Vec<Trade>,
    pub stats: TradeStats,
}

/// Classifier input for bar `index`: the bar's own values as "current" and
/// its predecessor's as "previous". Bar 0 has no predecessor, so its
/// crossing rules skip.
fn bar_snapshot(bars: &[EnrichedBar], index: usize) -> IndicatorSnapshot {
    let bar = &bars[index];
    let prev = index.checked_sub(1).map(|i| &bars[i]);
    IndicatorSnapshot {
        price: Some(bar.close),
        price_prev: prev.map(|p| p.close),
        rsi: bar.rsi,
        rsi_prev: prev.and_then(|p| p.rsi),
        macd: bar.macd,
        macd_signal: bar.macd_signal,
        macd_prev: prev.and_then(|p| p.macd),
        macd_signal_prev: prev.and_then(|p| p.macd_signal),
        ma20: bar.sma20,
        volume_ratio: bar.volume_ratio,
        ..IndicatorSnapshot::default()
    }
}

/// Classify every bar up front so the main loop can index the lagged series.
fn classify_all(bars: &[EnrichedBar], thresholds: &SignalThresholds) -> Vec<TechnicalSignal> {
    (0..bars.len())
        .map(|i| classify(&bar_snapshot(bars, i), thresholds))
        .collect()
}

fn close_position(
    position: Position,
    exit_date: chrono::NaiveDate,
    exit_price: f64,
    exit_reason: ExitReason,
    transaction_cost: f64,
) -> Trade {
    let delta = position.directional_delta(exit_price);
    Trade {
        direction: position.direction,
        entry_date: position.entry_date,
        exit_date,
        entry_price: position.entry_price,
        exit_price,
        exit_reason,
        result: delta - 2.0 * transaction_cost,
    }
}

/// Run one backtest over the bar sequence. The input is never mutated.
///
/// An empty sequence is a [`StockpilotError::NoData`] result, not a panic.
pub fn run(bars: &[EnrichedBar], params: &SimulationParams) -> Result<BacktestResult, StockpilotError> {
    if bars.is_empty() {
        return Err(StockpilotError::NoData {
            code: "price history".to_string(),
        });
    }

    let signals = classify_all(bars, &params.thresholds);
    let delay = params.signal_delay;
    let cost = params.transaction_cost;

    let mut capital = params.start_capital;
    let mut position: Option<Position> = None;
    let mut trades: Vec<Trade> = Vec::new();

    for i in delay.max(1)..bars.len() {
        let bar = &bars[i];
        let effective = &signals[i - delay];

        if let Some(open) = position.take() {
            let exit = if open.stop_hit(bar) {
                Some((open.stop_loss, ExitReason::StopLoss))
            } else if open.target_hit(bar) {
                Some((open.take_profit, ExitReason::TakeProfit))
            } else {
                let signal_exit = match open.direction {
                    Direction::Long => effective.is_sell(),
                    Direction::Short => effective.is_buy(),
                };
                signal_exit.then_some((bar.close, ExitReason::Signal))
            };

            match exit {
                Some((price, reason)) => {
                    let trade = close_position(open, bar.date, price, reason, cost);
                    capital += trade.result + cost; // entry leg was paid at open
                    trades.push(trade);
                    continue;
                }
                None => position = Some(open),
            }
        }

        if position.is_none() {
            let direction = if effective.is_buy() {
                Some(Direction::Long)
            } else if effective.is_sell() {
                Some(Direction::Short)
            } else {
                None
            };
            if let Some(direction) = direction {
                position = Some(Position::open(
                    direction,
                    bar.close,
                    bar.date,
                    params.stop_loss_pct,
                    params.take_profit_pct,
                ));
                capital -= cost;
            }
        }
    }

    // Force-close whatever survived the period at the final close.
    if let Some(open) = position.take() {
        let last = &bars[bars.len() - 1];
        let trade = close_position(open, last.date, last.close, ExitReason::EndOfPeriod, cost);
        capital += trade.result + cost;
        trades.push(trade);
    }

    let return_pct = if params.start_capital > 0.0 {
        (capital - params.start_capital) / params.start_capital * 100.0
    } else {
        0.0
    };

    let stats = TradeStats::compute(&trades);

    Ok(BacktestResult {
        start_capital: params.start_capital,
        final_capital: capital,
        return_pct,
        trades,
        stats,
    })
}
