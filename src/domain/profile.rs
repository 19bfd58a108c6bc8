//! Rule profile: the thresholds the advice engine evaluates against.
//!
//! Supplied by the caller (config file, UI sliders) and read-only to the
//! engine. Defaults match the values the profile sidebar ships with.

/// Sell-side rules and position sizing limits.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralRules {
    /// Maximum share of the portfolio one position may grow to.
    pub max_position_weight: f64,
    /// Sell once price exceeds the analyst target by this multiplier
    /// (1.10 = 10% above target).
    pub sell_above_target: f64,
    /// Sell when P/E exceeds this ceiling (profitable companies only).
    pub sell_pe_above: f64,
    /// Sell when debt/equity exceeds this ceiling.
    pub sell_debt_equity_above: f64,
}

impl Default for GeneralRules {
    fn default() -> Self {
        GeneralRules {
            max_position_weight: 0.15,
            sell_above_target: 1.10,
            sell_pe_above: 100.0,
            sell_debt_equity_above: 4.0,
        }
    }
}

/// Trend and volume rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalRules {
    /// Minimum 7-day/3-month volume ratio for the momentum flag.
    pub min_volume_ratio: f64,
    /// When set, the two trend checks join the quality score and the
    /// pass bar rises from 3 to 5.
    pub trend_check: bool,
    /// Maximum distance below the 52-week high (0.15 = within 15%).
    pub max_distance_from_high: f64,
}

impl Default for TechnicalRules {
    fn default() -> Self {
        TechnicalRules {
            min_volume_ratio: 1.2,
            trend_check: true,
            max_distance_from_high: 0.15,
        }
    }
}

/// Quality and stability floors.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityRules {
    pub min_return_on_equity: f64,
    pub max_beta: f64,
}

impl Default for QualityRules {
    fn default() -> Self {
        QualityRules {
            min_return_on_equity: 0.15,
            max_beta: 1.2,
        }
    }
}

/// Valuation ceilings for the buy side.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationRules {
    /// Minimum analyst upside, as a fraction (0.25 = 25%).
    pub min_upside: f64,
    pub max_pe: f64,
    pub max_pb: f64,
    pub max_ps: f64,
    pub max_debt_equity: f64,
    pub min_profit_margin: f64,
}

impl Default for ValuationRules {
    fn default() -> Self {
        ValuationRules {
            min_upside: 0.25,
            max_pe: 25.0,
            max_pb: 2.5,
            max_ps: 4.0,
            max_debt_equity: 1.5,
            min_profit_margin: 0.10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub general: GeneralRules,
    pub technical: TechnicalRules,
    pub quality: QualityRules,
    pub valuation: ValuationRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_general_rules() {
        let g = GeneralRules::default();
        assert!((g.max_position_weight - 0.15).abs() < f64::EPSILON);
        assert!((g.sell_above_target - 1.10).abs() < f64::EPSILON);
        assert!((g.sell_pe_above - 100.0).abs() < f64::EPSILON);
        assert!((g.sell_debt_equity_above - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_technical_rules() {
        let t = TechnicalRules::default();
        assert!((t.min_volume_ratio - 1.2).abs() < f64::EPSILON);
        assert!(t.trend_check);
        assert!((t.max_distance_from_high - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn default_quality_rules() {
        let q = QualityRules::default();
        assert!((q.min_return_on_equity - 0.15).abs() < f64::EPSILON);
        assert!((q.max_beta - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn default_valuation_rules() {
        let v = ValuationRules::default();
        assert!((v.min_upside - 0.25).abs() < f64::EPSILON);
        assert!((v.max_pe - 25.0).abs() < f64::EPSILON);
        assert!((v.max_pb - 2.5).abs() < f64::EPSILON);
        assert!((v.max_ps - 4.0).abs() < f64::EPSILON);
        assert!((v.max_debt_equity - 1.5).abs() < f64::EPSILON);
        assert!((v.min_profit_margin - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn profile_default_composes_groups() {
        let p = Profile::default();
        assert_eq!(p.general, GeneralRules::default());
        assert_eq!(p.technical, TechnicalRules::default());
        assert_eq!(p.quality, QualityRules::default());
        assert_eq!(p.valuation, ValuationRules::default());
    }
}
