//! CLI config-builder tests.
//!
//! Exercises the INI → domain-config path: building simulation parameters,
//! profiles, optimizer ranges and metrics from files, plus the validation
//! that guards them.

use stockpilot::adapters::file_config_adapter::FileConfigAdapter;
use stockpilot::cli::{
    build_metric, build_profile, build_ranges, build_simulation_params, build_thresholds,
    resolve_code,
};
use stockpilot::domain::config_validation::{
    validate_optimizer_config, validate_profile_config, validate_simulation_config,
};
use stockpilot::domain::error::StockpilotError;
use stockpilot::domain::optimizer::OptimizeMetric;
use std::io::Write;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn adapter_from(content: &str) -> FileConfigAdapter {
    let file = write_temp_ini(content);
    FileConfigAdapter::from_file(file.path()).unwrap()
}

mod simulation_params {
    use super::*;

    #[test]
    fn full_config_round_trips() {
        let adapter = adapter_from(
            r#"
[simulation]
start_capital = 25000
transaction_cost = 2.5
signal_delay = 2
stop_loss_pct = 0.08
take_profit_pct = 0.15

[signals]
rsi_oversold = 25
rsi_overbought = 75
min_volume_ratio = 2.0
"#,
        );
        let params = build_simulation_params(&adapter);
        assert!((params.start_capital - 25_000.0).abs() < f64::EPSILON);
        assert!((params.transaction_cost - 2.5).abs() < f64::EPSILON);
        assert_eq!(params.signal_delay, 2);
        assert!((params.stop_loss_pct - 0.08).abs() < f64::EPSILON);
        assert!((params.take_profit_pct - 0.15).abs() < f64::EPSILON);
        assert!((params.thresholds.rsi_oversold - 25.0).abs() < f64::EPSILON);
        assert!((params.thresholds.rsi_overbought - 75.0).abs() < f64::EPSILON);
        assert!((params.thresholds.min_volume_ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_config_uses_documented_defaults() {
        let adapter = adapter_from("[simulation]\n");
        let params = build_simulation_params(&adapter);
        assert!((params.start_capital - 10_000.0).abs() < f64::EPSILON);
        assert!((params.transaction_cost - 5.0).abs() < f64::EPSILON);
        assert_eq!(params.signal_delay, 1);
        assert!((params.stop_loss_pct - 0.05).abs() < f64::EPSILON);
        assert!((params.take_profit_pct - 0.10).abs() < f64::EPSILON);

        let thresholds = build_thresholds(&adapter);
        assert!((thresholds.rsi_oversold - 30.0).abs() < f64::EPSILON);
        assert!((thresholds.rsi_overbought - 70.0).abs() < f64::EPSILON);
        assert!((thresholds.min_volume_ratio - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let adapter = adapter_from("[simulation]\nstart_capital = -5\n");
        assert!(validate_simulation_config(&adapter).is_err());

        let adapter = adapter_from("[simulation]\nstop_loss_pct = 2.0\n");
        assert!(validate_simulation_config(&adapter).is_err());

        let adapter = adapter_from("[signals]\nrsi_oversold = 80\nrsi_overbought = 20\n");
        assert!(validate_simulation_config(&adapter).is_err());
    }
}

mod profile_building {
    use super::*;

    #[test]
    fn full_profile_round_trips() {
        let adapter = adapter_from(
            r#"
[general]
max_position_weight = 0.10
sell_above_target = 1.20
sell_pe_above = 80
sell_debt_equity_above = 3.0

[technical]
min_volume_ratio = 1.4
trend_check = no
max_distance_from_high = 0.20

[quality]
min_return_on_equity = 0.12
max_beta = 1.5

[valuation]
min_upside = 0.30
max_pe = 20
max_pb = 2.0
max_ps = 3.0
max_debt_equity = 1.0
min_profit_margin = 0.05
"#,
        );
        let profile = build_profile(&adapter);
        assert!((profile.general.max_position_weight - 0.10).abs() < f64::EPSILON);
        assert!((profile.general.sell_above_target - 1.20).abs() < f64::EPSILON);
        assert!((profile.general.sell_pe_above - 80.0).abs() < f64::EPSILON);
        assert!((profile.general.sell_debt_equity_above - 3.0).abs() < f64::EPSILON);
        assert!((profile.technical.min_volume_ratio - 1.4).abs() < f64::EPSILON);
        assert!(!profile.technical.trend_check);
        assert!((profile.technical.max_distance_from_high - 0.20).abs() < f64::EPSILON);
        assert!((profile.quality.min_return_on_equity - 0.12).abs() < f64::EPSILON);
        assert!((profile.quality.max_beta - 1.5).abs() < f64::EPSILON);
        assert!((profile.valuation.min_upside - 0.30).abs() < f64::EPSILON);
        assert!((profile.valuation.max_pe - 20.0).abs() < f64::EPSILON);
        assert!((profile.valuation.max_pb - 2.0).abs() < f64::EPSILON);
        assert!((profile.valuation.max_ps - 3.0).abs() < f64::EPSILON);
        assert!((profile.valuation.max_debt_equity - 1.0).abs() < f64::EPSILON);
        assert!((profile.valuation.min_profit_margin - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let adapter = adapter_from("[general]\nmax_position_weight = 0.20\n");
        let profile = build_profile(&adapter);
        assert!((profile.general.max_position_weight - 0.20).abs() < f64::EPSILON);
        // Everything else keeps its documented default.
        assert!((profile.general.sell_above_target - 1.10).abs() < f64::EPSILON);
        assert!(profile.technical.trend_check);
        assert!((profile.valuation.max_pe - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_profile_values_fail_validation() {
        let adapter = adapter_from("[general]\nmax_position_weight = 1.5\n");
        assert!(validate_profile_config(&adapter).is_err());

        let adapter = adapter_from("[technical]\nmax_distance_from_high = 1.0\n");
        assert!(validate_profile_config(&adapter).is_err());
    }
}

mod optimizer_config {
    use super::*;

    #[test]
    fn ranges_round_trip() {
        let adapter = adapter_from(
            r#"
[optimizer]
delay_min = 1
delay_max = 2
stop_loss_min = 0.02
stop_loss_max = 0.06
take_profit_min = 0.08
take_profit_max = 0.12
"#,
        );
        let ranges = build_ranges(&adapter);
        assert_eq!(ranges.delay, (1, 2));
        assert!((ranges.stop_loss_pct.0 - 0.02).abs() < f64::EPSILON);
        assert!((ranges.stop_loss_pct.1 - 0.06).abs() < f64::EPSILON);
        assert!((ranges.take_profit_pct.0 - 0.08).abs() < f64::EPSILON);
        assert!((ranges.take_profit_pct.1 - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn default_ranges_when_unconfigured() {
        let adapter = adapter_from("[optimizer]\n");
        let ranges = build_ranges(&adapter);
        assert_eq!(ranges.delay, (0, 3));
        assert!((ranges.stop_loss_pct.0 - 0.01).abs() < f64::EPSILON);
        assert!((ranges.take_profit_pct.1 - 0.20).abs() < f64::EPSILON);
    }

    #[test]
    fn metric_defaults_to_return() {
        let adapter = adapter_from("[optimizer]\n");
        assert_eq!(build_metric(&adapter).unwrap(), OptimizeMetric::TotalReturn);
    }

    #[test]
    fn sharpe_parses_but_unknown_metric_errors() {
        let adapter = adapter_from("[optimizer]\nmetric = sharpe\n");
        assert_eq!(build_metric(&adapter).unwrap(), OptimizeMetric::Sharpe);

        let adapter = adapter_from("[optimizer]\nmetric = drawdown\n");
        let err = build_metric(&adapter).unwrap_err();
        assert!(matches!(
            err,
            StockpilotError::ConfigInvalid { key, .. } if key == "metric"
        ));
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let adapter = adapter_from("[optimizer]\ndelay_min = 5\ndelay_max = 2\n");
        assert!(validate_optimizer_config(&adapter).is_err());

        let adapter = adapter_from("[optimizer]\ntake_profit_min = 0.2\ntake_profit_max = 0.1\n");
        assert!(validate_optimizer_config(&adapter).is_err());
    }
}

mod code_resolution {
    use super::*;

    #[test]
    fn override_beats_config() {
        let adapter = adapter_from("[data]\ncode = acme\n");
        assert_eq!(resolve_code(Some("zen"), &adapter), Some("ZEN".to_string()));
    }

    #[test]
    fn config_code_is_uppercased() {
        let adapter = adapter_from("[data]\ncode = acme\n");
        assert_eq!(resolve_code(None, &adapter), Some("ACME".to_string()));
    }

    #[test]
    fn missing_code_is_none() {
        let adapter = adapter_from("[data]\n");
        assert_eq!(resolve_code(None, &adapter), None);
    }

    #[test]
    fn blank_code_is_none() {
        let adapter = adapter_from("[data]\ncode =  \n");
        assert_eq!(resolve_code(None, &adapter), None);
    }
}
