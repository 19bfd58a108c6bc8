//! Brute-force parameter optimization.
//!
//! Sweeps the simulator over the Cartesian product of signal delay,
//! stop-loss and take-profit ranges and keeps the combination with the
//! highest total return. Cells are independent simulations, so the sweep
//! runs in parallel; ties are broken by grid position (lowest delay, then
//! stop-loss, then take-profit), never by completion order.

use crate::domain::bar::EnrichedBar;
use crate::domain::error::StockpilotError;
use crate::domain::simulator::{run, SimulationParams};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Percent axes advance in steps of 0.01.
const PCT_STEP_CENTI: i64 = 1;

/// The metric a sweep ranks results by.
///
/// Only total return is implemented; `Sharpe` parses so configs can name it,
/// but the optimizer rejects it before any simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeMetric {
    TotalReturn,
    Sharpe,
}

impl FromStr for OptimizeMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "return" | "total_return" => Ok(OptimizeMetric::TotalReturn),
            "sharpe" => Ok(OptimizeMetric::Sharpe),
            other => Err(format!("unknown metric '{other}' (expected 'return')")),
        }
    }
}

impl fmt::Display for OptimizeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizeMetric::TotalReturn => f.write_str("return"),
            OptimizeMetric::Sharpe => f.write_str("sharpe"),
        }
    }
}

/// Inclusive sweep ranges. Delay advances by whole bars, the percent axes
/// by hundredths.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRanges {
    pub delay: (usize, usize),
    pub stop_loss_pct: (f64, f64),
    pub take_profit_pct: (f64, f64),
}

impl Default for ParameterRanges {
    fn default() -> Self {
        ParameterRanges {
            delay: (0, 3),
            stop_loss_pct: (0.01, 0.10),
            take_profit_pct: (0.05, 0.20),
        }
    }
}

/// One cell of the sweep grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub signal_delay: usize,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

impl ParameterRanges {
    /// Centi-steps over a percent range; integer arithmetic keeps the grid
    /// free of float accumulation drift.
    fn pct_axis(range: (f64, f64)) -> Vec<f64> {
        let lo = (range.0 * 100.0).round() as i64;
        let hi = (range.1 * 100.0).round() as i64;
        (lo..=hi)
            .step_by(PCT_STEP_CENTI as usize)
            .map(|c| c as f64 / 100.0)
            .collect()
    }

    /// All grid cells, delay outermost and take-profit innermost. The
    /// position in this list is the tie-break rank.
    pub fn combinations(&self) -> Vec<ParameterSet> {
        let stops = Self::pct_axis(self.stop_loss_pct);
        let takes = Self::pct_axis(self.take_profit_pct);

        let mut combos = Vec::new();
        for delay in self.delay.0..=self.delay.1 {
            for &stop_loss_pct in &stops {
                for &take_profit_pct in &takes {
                    combos.push(ParameterSet {
                        signal_delay: delay,
                        stop_loss_pct,
                        take_profit_pct,
                    });
                }
            }
        }
        combos
    }
}

/// The winning cell and the metric value it scored.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimization {
    pub params: ParameterSet,
    pub metric: OptimizeMetric,
    pub metric_value: f64,
}

/// Sweep the grid and return the best combination by the requested metric.
///
/// Cells whose backtest fails contribute nothing; if the whole grid fails
/// (or is empty) the sweep itself fails with a readable reason.
pub fn optimize(
    bars: &[EnrichedBar],
    base: &SimulationParams,
    ranges: &ParameterRanges,
    metric: OptimizeMetric,
) -> Result<Optimization, StockpilotError> {
    if metric != OptimizeMetric::TotalReturn {
        return Err(StockpilotError::UnsupportedMetric {
            metric: metric.to_string(),
        });
    }

    let combos = ranges.combinations();
    if combos.is_empty() {
        return Err(StockpilotError::OptimizationFailed {
            reason: "parameter grid is empty".to_string(),
        });
    }

    let best = combos
        .par_iter()
        .enumerate()
        .filter_map(|(rank, combo)| {
            let params = SimulationParams {
                signal_delay: combo.signal_delay,
                stop_loss_pct: combo.stop_loss_pct,
                take_profit_pct: combo.take_profit_pct,
                ..base.clone()
            };
            run(bars, &params).ok().map(|r| (rank, r.return_pct))
        })
        .reduce_with(|a, b| {
            // Strictly greater wins; on an exact tie the earlier grid cell
            // does. Associative and commutative, so the parallel reduction
            // order cannot change the winner.
            if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                b
            } else {
                a
            }
        });

    match best {
        Some((rank, metric_value)) => Ok(Optimization {
            params: combos[rank],
            metric,
            metric_value,
        }),
        None => Err(StockpilotError::OptimizationFailed {
            reason: "no parameter combination produced a valid result".to_string(),
        }),
    }
}
