//! Position tracking and closed-trade records.

use crate::domain::bar::EnrichedBar;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("Long"),
            Direction::Short => f.write_str("Short"),
        }
    }
}

/// The single open slot of a simulation run.
///
/// Stop-loss and take-profit trigger prices are fixed at entry; a trigger
/// price of 0.0 means that trigger is disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Position {
    /// Open a position at `entry_price`, deriving the trigger prices from
    /// the given percentages. Non-positive percentages disable the trigger.
    pub fn open(
        direction: Direction,
        entry_price: f64,
        entry_date: NaiveDate,
        stop_loss_pct: f64,
        take_profit_pct: f64,
    ) -> Self {
        let stop_loss = if stop_loss_pct > 0.0 {
            match direction {
                Direction::Long => entry_price * (1.0 - stop_loss_pct),
                Direction::Short => entry_price * (1.0 + stop_loss_pct),
            }
        } else {
            0.0
        };

        let take_profit = if take_profit_pct > 0.0 {
            match direction {
                Direction::Long => entry_price * (1.0 + take_profit_pct),
                Direction::Short => entry_price * (1.0 - take_profit_pct),
            }
        } else {
            0.0
        };

        Position {
            direction,
            entry_price,
            entry_date,
            stop_loss,
            take_profit,
        }
    }

    /// Did this bar touch the stop? Longs stop on the low, shorts on the high.
    pub fn stop_hit(&self, bar: &EnrichedBar) -> bool {
        if self.stop_loss == 0.0 {
            return false;
        }
        match self.direction {
            Direction::Long => bar.low <= self.stop_loss,
            Direction::Short => bar.high >= self.stop_loss,
        }
    }

    /// Did this bar touch the target? Longs target on the high, shorts on the low.
    pub fn target_hit(&self, bar: &EnrichedBar) -> bool {
        if self.take_profit == 0.0 {
            return false;
        }
        match self.direction {
            Direction::Long => bar.high >= self.take_profit,
            Direction::Short => bar.low <= self.take_profit,
        }
    }

    /// Signed price move captured by exiting at `exit_price`.
    pub fn directional_delta(&self, exit_price: f64) -> f64 {
        match self.direction {
            Direction::Long => exit_price - self.entry_price,
            Direction::Short => self.entry_price - exit_price,
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Signal,
    EndOfPeriod,
}

impl ExitReason {
    pub fn label(&self, direction: Direction) -> String {
        match (self, direction) {
            (ExitReason::StopLoss, d) => format!("Stop Loss ({d})"),
            (ExitReason::TakeProfit, d) => format!("Take Profit ({d})"),
            (ExitReason::Signal, Direction::Long) => "Sell signal (close Long)".to_string(),
            (ExitReason::Signal, Direction::Short) => "Buy signal (close Short)".to_string(),
            (ExitReason::EndOfPeriod, d) => format!("End of period ({d})"),
        }
    }
}

/// One completed round-trip. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub direction: Direction,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    /// Directional price delta minus the transaction cost charged at entry
    /// and again at exit.
    pub result: f64,
}
