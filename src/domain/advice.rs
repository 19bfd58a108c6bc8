//! Advice rule engine.
//!
//! Evaluates one snapshot against a profile and the portfolio context and
//! returns a buy/hold/sell decision with its full check breakdown.
//!
//! Sell rules run first and short-circuit; they only apply to positions
//! actually held. Buy scoring always runs otherwise: four fundamental
//! quality checks (plus two technical checks when the trend check is on)
//! against an escalating threshold, and four valuation checks against a
//! fixed 3-of-4 bar.

use crate::domain::profile::Profile;
use crate::domain::snapshot::IndicatorSnapshot;
use std::fmt;

/// Portfolio totals above this are treated as the screening sentinel.
pub const SCREENING_THRESHOLD: f64 = 999_999_000.0;

/// Whether the instrument under evaluation is actually held.
///
/// Screening candidates (not held) skip the sell rules entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortfolioContext {
    Held {
        position_value: f64,
        total_value: f64,
    },
    Screening,
}

impl PortfolioContext {
    /// Build a context from raw totals, applying the sentinel convention:
    /// a caller that passes a total above [`SCREENING_THRESHOLD`] is
    /// screening, not holding.
    pub fn from_totals(position_value: f64, total_value: f64) -> Self {
        if total_value > SCREENING_THRESHOLD {
            PortfolioContext::Screening
        } else {
            PortfolioContext::Held {
                position_value,
                total_value,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    SellFundamentals,
    SellRebalance,
    SellOvervalued,
    BuyStrongMomentum,
    BuyStrong,
    Hold,
}

impl Decision {
    pub fn is_sell(&self) -> bool {
        matches!(
            self,
            Decision::SellFundamentals | Decision::SellRebalance | Decision::SellOvervalued
        )
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Decision::BuyStrongMomentum | Decision::BuyStrong)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Decision::SellFundamentals => "SELL (BAD FUNDAMENTALS)",
            Decision::SellRebalance => "SELL (REBALANCE)",
            Decision::SellOvervalued => "SELL (OVERVALUED)",
            Decision::BuyStrongMomentum => "BUY (STRONG SIGNAL + MOMENTUM)",
            Decision::BuyStrong => "BUY (STRONG SIGNAL)",
            Decision::Hold => "HOLD",
        };
        f.write_str(label)
    }
}

/// Every boolean check the buy scoring evaluates, by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checks {
    pub profit_margin_ok: bool,
    pub debt_equity_ok: bool,
    pub roe_ok: bool,
    pub beta_ok: bool,
    pub uptrend: bool,
    pub near_52w_high: bool,
    pub undervalued: bool,
    pub pe_ok: bool,
    pub pb_ok: bool,
    pub ps_ok: bool,
    pub momentum: bool,
}

/// Scores and thresholds behind a buy-side decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub quality_score: u32,
    pub quality_threshold: u32,
    pub value_score: u32,
    pub value_threshold: u32,
    pub checks: Checks,
}

/// A decision plus, for buy-side evaluations, its breakdown. Sell rules
/// short-circuit before any check is scored, so they carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub decision: Decision,
    pub breakdown: Option<Breakdown>,
}

const VALUE_THRESHOLD: u32 = 3;

fn count(checks: &[bool]) -> u32 {
    checks.iter().filter(|c| **c).count() as u32
}

/// Evaluate one snapshot. Absent fields never raise: each rule applies its
/// documented substitution or fails on its own.
pub fn evaluate(
    snapshot: &IndicatorSnapshot,
    profile: &Profile,
    context: &PortfolioContext,
) -> Advice {
    let margin = snapshot.profit_margin_or_zero();
    let debt_equity = snapshot.debt_equity_or_infinite();
    let pe = snapshot.pe_or_infinite();
    let price = snapshot.price.unwrap_or(0.0);
    let ma50 = snapshot.ma50.unwrap_or(0.0);
    let ma200 = snapshot.ma200.unwrap_or(0.0);
    let downtrend = price < ma50 && price < ma200;

    if let PortfolioContext::Held {
        position_value,
        total_value,
    } = context
    {
        // Rule 1: at least 2 of the 4 red flags.
        let losing_money = margin < 0.0;
        let excessive_debt = debt_equity > profile.general.sell_debt_equity_above;
        let extreme_valuation = pe > profile.general.sell_pe_above && pe > 0.0;
        let red_flags = count(&[losing_money, excessive_debt, extreme_valuation, downtrend]);
        if red_flags >= 2 {
            return Advice {
                decision: Decision::SellFundamentals,
                breakdown: None,
            };
        }

        // Rule 2: position outgrew its allowed portfolio share.
        if *total_value > 0.0 {
            let weight = position_value / total_value;
            if weight > profile.general.max_position_weight {
                return Advice {
                    decision: Decision::SellRebalance,
                    breakdown: None,
                };
            }
        }

        // Rule 3: price ran past the analyst target.
        let target = snapshot.target_price.unwrap_or(0.0);
        if target > 0.0 && price > 0.0 && price / target > profile.general.sell_above_target {
            return Advice {
                decision: Decision::SellOvervalued,
                breakdown: None,
            };
        }
    }

    let checks = Checks {
        profit_margin_ok: margin > profile.valuation.min_profit_margin,
        debt_equity_ok: debt_equity < profile.valuation.max_debt_equity,
        roe_ok: snapshot.return_on_equity.unwrap_or(0.0) > profile.quality.min_return_on_equity,
        beta_ok: snapshot
            .beta
            .is_some_and(|b| b < profile.quality.max_beta),
        uptrend: ma50 > 0.0 && ma200 > 0.0 && price > ma50 && ma50 > ma200,
        near_52w_high: snapshot
            .high_52w
            .is_some_and(|h| h > 0.0 && price / h > 1.0 - profile.technical.max_distance_from_high),
        undervalued: snapshot.upside.unwrap_or(0.0) > profile.valuation.min_upside,
        pe_ok: pe > 0.0 && pe < profile.valuation.max_pe,
        pb_ok: snapshot
            .pb_ratio
            .is_some_and(|v| v > 0.0 && v < profile.valuation.max_pb),
        ps_ok: snapshot
            .ps_ratio
            .is_some_and(|v| v > 0.0 && v < profile.valuation.max_ps),
        momentum: snapshot.volume_ratio.unwrap_or(0.0) > profile.technical.min_volume_ratio
            && snapshot.day_change_pct.unwrap_or(0.0) > 0.0,
    };

    let mut quality_score = count(&[
        checks.profit_margin_ok,
        checks.debt_equity_ok,
        checks.roe_ok,
        checks.beta_ok,
    ]);
    // 3 of 4 fundamentals normally; adding the two trend checks raises the
    // bar to 5 of 6.
    let mut quality_threshold = 3;
    if profile.technical.trend_check {
        quality_score += count(&[checks.uptrend, checks.near_52w_high]);
        quality_threshold = 5;
    }

    let value_score = count(&[
        checks.undervalued,
        checks.pe_ok,
        checks.pb_ok,
        checks.ps_ok,
    ]);

    let decision = if quality_score >= quality_threshold && value_score >= VALUE_THRESHOLD {
        if checks.momentum {
            Decision::BuyStrongMomentum
        } else {
            Decision::BuyStrong
        }
    } else {
        Decision::Hold
    };

    Advice {
        decision,
        breakdown: Some(Breakdown {
            quality_score,
            quality_threshold,
            value_score,
            value_threshold: VALUE_THRESHOLD,
            checks,
        }),
    }
}
