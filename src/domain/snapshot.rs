//! Point-in-time instrument snapshot.
//!
//! Every numeric field is optional: the data collaborator may not know a
//! ratio or an indicator for a given instrument, and the rule engines must
//! keep working when it doesn't. The `*_or_*` accessors encode the one
//! substitution each absent field gets; everything else is handled at the
//! rule site by skipping or failing that single check.

/// Current fundamentals and technicals for one instrument.
///
/// `price`/`rsi`/`macd` carry the most recent value, the `_prev` twins the
/// value one bar earlier (used for crossing detection).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub price: Option<f64>,
    pub price_prev: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_prev: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_prev: Option<f64>,
    pub macd_signal_prev: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub high_52w: Option<f64>,
    /// 7-day average volume divided by the 3-month average.
    pub volume_ratio: Option<f64>,
    pub day_change_pct: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub ps_ratio: Option<f64>,
    pub debt_equity: Option<f64>,
    pub profit_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub beta: Option<f64>,
    pub target_price: Option<f64>,
    /// Analyst upside, (target / price) - 1.
    pub upside: Option<f64>,
    pub sector: Option<String>,
    pub region: Option<String>,
}

impl IndicatorSnapshot {
    /// An unknown profit margin is neutral: neither a red flag nor a pass.
    pub fn profit_margin_or_zero(&self) -> f64 {
        self.profit_margin.unwrap_or(0.0)
    }

    /// An unknown debt/equity fails every ceiling it is compared against.
    pub fn debt_equity_or_infinite(&self) -> f64 {
        self.debt_equity.unwrap_or(f64::INFINITY)
    }

    /// An unknown P/E fails every ceiling it is compared against.
    pub fn pe_or_infinite(&self) -> f64 {
        self.pe_ratio.unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_all_unknown() {
        let snap = IndicatorSnapshot::default();
        assert!(snap.price.is_none());
        assert!(snap.rsi.is_none());
        assert!(snap.debt_equity.is_none());
        assert!(snap.sector.is_none());
    }

    #[test]
    fn missing_profit_margin_is_neutral() {
        let snap = IndicatorSnapshot::default();
        assert!((snap.profit_margin_or_zero() - 0.0).abs() < f64::EPSILON);

        let snap = IndicatorSnapshot {
            profit_margin: Some(0.12),
            ..Default::default()
        };
        assert!((snap.profit_margin_or_zero() - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_debt_equity_fails_ceilings() {
        let snap = IndicatorSnapshot::default();
        assert!(snap.debt_equity_or_infinite().is_infinite());
        assert!(snap.debt_equity_or_infinite() > 4.0);
    }

    #[test]
    fn missing_pe_fails_ceilings() {
        let snap = IndicatorSnapshot::default();
        assert!(snap.pe_or_infinite().is_infinite());

        let snap = IndicatorSnapshot {
            pe_ratio: Some(18.5),
            ..Default::default()
        };
        assert!((snap.pe_or_infinite() - 18.5).abs() < f64::EPSILON);
    }
}
