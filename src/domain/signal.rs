//! Technical signal classifier.
//!
//! Turns a snapshot's indicator deltas into a graded trade signal.
//!
//! # Evaluation Semantics
//!
//! - Each crossing rule needs the current and previous value of its
//!   indicator; if either is unknown the rule is skipped, not failed.
//! - Crossings fire only on the transition bar: `curr > x && prev <= x`
//!   (bullish) or the mirror (bearish).
//! - Grading counts fired rules. A bearish crossing among two or more
//!   fired rules outweighs any bullish cluster and grades as Sell.

use crate::domain::snapshot::IndicatorSnapshot;
use std::fmt;

/// Classifier thresholds, injected once per profile/simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalThresholds {
    /// RSI level a bullish cross must come up through.
    pub rsi_oversold: f64,
    /// RSI level a bearish cross must fall down through.
    pub rsi_overbought: f64,
    /// Volume ratio above which the high-volume rule fires.
    pub min_volume_ratio: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            min_volume_ratio: 1.5,
        }
    }
}

/// A single fired rule, in the order rules are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    RsiBullishCross,
    MacdBullishCross,
    PriceAboveMa20,
    HighVolume,
    RsiBearishCross,
    MacdBearishCross,
    PriceBelowMa20,
}

impl Reason {
    pub fn label(&self) -> &'static str {
        match self {
            Reason::RsiBullishCross => "RSI Bullish Cross",
            Reason::MacdBullishCross => "MACD Bullish Cross",
            Reason::PriceAboveMa20 => "Price > 20d MA",
            Reason::HighVolume => "High Volume",
            Reason::RsiBearishCross => "RSI Bearish Cross",
            Reason::MacdBearishCross => "MACD Bearish Cross",
            Reason::PriceBelowMa20 => "Price < 20d MA",
        }
    }

    /// Only the RSI/MACD bearish crossings count as bearish for grading;
    /// a price slip below the 20-day MA alone does not force a Sell.
    pub fn is_bearish(&self) -> bool {
        matches!(self, Reason::RsiBearishCross | Reason::MacdBearishCross)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalGrade {
    Neutral,
    Weak,
    Buy,
    BuyStrong,
    Sell,
}

/// A graded signal plus the rules that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalSignal {
    pub grade: SignalGrade,
    pub reasons: Vec<Reason>,
}

impl TechnicalSignal {
    pub fn neutral() -> Self {
        TechnicalSignal {
            grade: SignalGrade::Neutral,
            reasons: Vec::new(),
        }
    }

    /// True for the grades that open a long or close a short.
    pub fn is_buy(&self) -> bool {
        matches!(self.grade, SignalGrade::Buy | SignalGrade::BuyStrong)
    }

    /// True for the grade that opens a short or closes a long.
    pub fn is_sell(&self) -> bool {
        self.grade == SignalGrade::Sell
    }
}

impl fmt::Display for TechnicalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.grade {
            SignalGrade::Neutral => return f.write_str("NEUTRAL"),
            SignalGrade::Weak => "WEAK",
            SignalGrade::Buy => "BUY",
            SignalGrade::BuyStrong => "BUY (STRONG)",
            SignalGrade::Sell => "SELL",
        };
        let labels: Vec<&str> = self.reasons.iter().map(|r| r.label()).collect();
        write!(f, "{} - {}", prefix, labels.join(", "))
    }
}

/// Classify one snapshot against the thresholds.
pub fn classify(snapshot: &IndicatorSnapshot, thresholds: &SignalThresholds) -> TechnicalSignal {
    let mut reasons = Vec::new();

    if let (Some(rsi), Some(rsi_prev)) = (snapshot.rsi, snapshot.rsi_prev) {
        if rsi > thresholds.rsi_oversold && rsi_prev <= thresholds.rsi_oversold {
            reasons.push(Reason::RsiBullishCross);
        }
    }

    if let (Some(macd), Some(signal), Some(macd_prev), Some(signal_prev)) = (
        snapshot.macd,
        snapshot.macd_signal,
        snapshot.macd_prev,
        snapshot.macd_signal_prev,
    ) {
        if macd > signal && macd_prev <= signal_prev {
            reasons.push(Reason::MacdBullishCross);
        }
    }

    if let (Some(price), Some(price_prev), Some(ma20)) =
        (snapshot.price, snapshot.price_prev, snapshot.ma20)
    {
        if price > ma20 && price_prev <= ma20 {
            reasons.push(Reason::PriceAboveMa20);
        }
    }

    // Unknown volume ratio never fires the rule.
    if snapshot.volume_ratio.unwrap_or(0.0) > thresholds.min_volume_ratio {
        reasons.push(Reason::HighVolume);
    }

    if let (Some(rsi), Some(rsi_prev)) = (snapshot.rsi, snapshot.rsi_prev) {
        if rsi < thresholds.rsi_overbought && rsi_prev >= thresholds.rsi_overbought {
            reasons.push(Reason::RsiBearishCross);
        }
    }

    if let (Some(macd), Some(signal), Some(macd_prev), Some(signal_prev)) = (
        snapshot.macd,
        snapshot.macd_signal,
        snapshot.macd_prev,
        snapshot.macd_signal_prev,
    ) {
        if macd < signal && macd_prev >= signal_prev {
            reasons.push(Reason::MacdBearishCross);
        }
    }

    if let (Some(price), Some(price_prev), Some(ma20)) =
        (snapshot.price, snapshot.price_prev, snapshot.ma20)
    {
        if price < ma20 && price_prev >= ma20 {
            reasons.push(Reason::PriceBelowMa20);
        }
    }

    let has_bearish = reasons.iter().any(|r| r.is_bearish());
    let grade = if reasons.is_empty() {
        SignalGrade::Neutral
    } else if has_bearish && reasons.len() >= 2 {
        SignalGrade::Sell
    } else if reasons.len() >= 3 {
        SignalGrade::BuyStrong
    } else if reasons.len() == 2 {
        SignalGrade::Buy
    } else {
        SignalGrade::Weak
    };

    TechnicalSignal { grade, reasons }
}
