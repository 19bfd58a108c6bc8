//! Summary statistics over a closed-trade log.

use crate::domain::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Winners as a percentage of all trades; 0 when there are none.
    pub win_rate_pct: f64,
    /// Mean result over winning trades; 0 when there are none.
    pub avg_win: f64,
    /// Mean result over losing trades (a negative number); 0 when there
    /// are none.
    pub avg_loss: f64,
    pub total_result: f64,
}

impl TradeStats {
    pub fn compute(trades: &[Trade]) -> Self {
        let total_trades = trades.len();
        if total_trades == 0 {
            return TradeStats {
                total_trades: 0,
                winning_trades: 0,
                losing_trades: 0,
                win_rate_pct: 0.0,
                avg_win: 0.0,
                avg_loss: 0.0,
                total_result: 0.0,
            };
        }

        let total_result: f64 = trades.iter().map(|t| t.result).sum();
        let winning_trades = trades.iter().filter(|t| t.result > 0.0).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate_pct = (winning_trades as f64 / total_trades as f64) * 100.0;

        let wins: f64 = trades.iter().map(|t| t.result).filter(|r| *r > 0.0).sum();
        let avg_win = if winning_trades > 0 {
            wins / winning_trades as f64
        } else {
            0.0
        };

        let loss_results: Vec<f64> = trades
            .iter()
            .map(|t| t.result)
            .filter(|r| *r < 0.0)
            .collect();
        let avg_loss = if !loss_results.is_empty() {
            loss_results.iter().sum::<f64>() / loss_results.len() as f64
        } else {
            0.0
        };

        TradeStats {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate_pct,
            avg_win,
            avg_loss,
            total_result,
        }
    }
}
