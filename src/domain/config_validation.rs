//! Configuration validation.
//!
//! Validates every config section up front so a bad value fails the run
//! before any data is fetched or any grid cell is simulated.

use crate::domain::error::StockpilotError;
use crate::domain::optimizer::OptimizeMetric;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    validate_start_capital(config)?;
    validate_transaction_cost(config)?;
    validate_signal_delay(config)?;
    validate_pct(config, "simulation", "stop_loss_pct", 0.05)?;
    validate_pct(config, "simulation", "take_profit_pct", 0.10)?;
    validate_signal_thresholds(config)?;
    Ok(())
}

pub fn validate_profile_config(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    validate_max_position_weight(config)?;
    validate_sell_above_target(config)?;
    validate_positive(config, "general", "sell_pe_above", 100.0)?;
    validate_positive(config, "general", "sell_debt_equity_above", 4.0)?;
    validate_positive(config, "technical", "min_volume_ratio", 1.2)?;
    validate_max_distance_from_high(config)?;
    validate_positive(config, "quality", "max_beta", 1.2)?;
    validate_positive(config, "valuation", "max_pe", 25.0)?;
    validate_positive(config, "valuation", "max_pb", 2.5)?;
    validate_positive(config, "valuation", "max_ps", 4.0)?;
    validate_positive(config, "valuation", "max_debt_equity", 1.5)?;
    Ok(())
}

pub fn validate_optimizer_config(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    validate_delay_range(config)?;
    validate_pct_range(config, "stop_loss_min", "stop_loss_max", 0.01, 0.10)?;
    validate_pct_range(config, "take_profit_min", "take_profit_max", 0.05, 0.20)?;
    validate_metric(config)?;
    Ok(())
}

fn validate_start_capital(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let value = config.get_double("simulation", "start_capital", 10_000.0);
    if value <= 0.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "start_capital".to_string(),
            reason: "start_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_transaction_cost(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let value = config.get_double("simulation", "transaction_cost", 5.0);
    if value < 0.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "transaction_cost".to_string(),
            reason: "transaction_cost must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_signal_delay(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let value = config.get_int("simulation", "signal_delay", 1);
    if value < 0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "signal_delay".to_string(),
            reason: "signal_delay must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_pct(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), StockpilotError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 || value >= 1.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be between 0 and 1 (exclusive)"),
        });
    }
    Ok(())
}

fn validate_signal_thresholds(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let oversold = config.get_double("signals", "rsi_oversold", 30.0);
    let overbought = config.get_double("signals", "rsi_overbought", 70.0);

    for (key, value) in [("rsi_oversold", oversold), ("rsi_overbought", overbought)] {
        if value <= 0.0 || value >= 100.0 {
            return Err(StockpilotError::ConfigInvalid {
                section: "signals".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be between 0 and 100"),
            });
        }
    }

    if oversold >= overbought {
        return Err(StockpilotError::ConfigInvalid {
            section: "signals".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be below rsi_overbought".to_string(),
        });
    }

    validate_positive(config, "signals", "min_volume_ratio", 1.5)
}

fn validate_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), StockpilotError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        });
    }
    Ok(())
}

fn validate_max_position_weight(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let value = config.get_double("general", "max_position_weight", 0.15);
    if value <= 0.0 || value > 1.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "general".to_string(),
            key: "max_position_weight".to_string(),
            reason: "max_position_weight must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_sell_above_target(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let value = config.get_double("general", "sell_above_target", 1.10);
    if value < 1.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "general".to_string(),
            key: "sell_above_target".to_string(),
            reason: "sell_above_target is a price/target multiplier and must be at least 1.0"
                .to_string(),
        });
    }
    Ok(())
}

fn validate_max_distance_from_high(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let value = config.get_double("technical", "max_distance_from_high", 0.15);
    if !(0.0..1.0).contains(&value) {
        return Err(StockpilotError::ConfigInvalid {
            section: "technical".to_string(),
            key: "max_distance_from_high".to_string(),
            reason: "max_distance_from_high must be in [0, 1)".to_string(),
        });
    }
    Ok(())
}

fn validate_delay_range(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let min = config.get_int("optimizer", "delay_min", 0);
    let max = config.get_int("optimizer", "delay_max", 3);
    if min < 0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "optimizer".to_string(),
            key: "delay_min".to_string(),
            reason: "delay_min must be non-negative".to_string(),
        });
    }
    if min > max {
        return Err(StockpilotError::ConfigInvalid {
            section: "optimizer".to_string(),
            key: "delay_min".to_string(),
            reason: "delay_min must not exceed delay_max".to_string(),
        });
    }
    Ok(())
}

fn validate_pct_range(
    config: &dyn ConfigPort,
    min_key: &str,
    max_key: &str,
    min_default: f64,
    max_default: f64,
) -> Result<(), StockpilotError> {
    let min = config.get_double("optimizer", min_key, min_default);
    let max = config.get_double("optimizer", max_key, max_default);
    for (key, value) in [(min_key, min), (max_key, max)] {
        if value <= 0.0 || value >= 1.0 {
            return Err(StockpilotError::ConfigInvalid {
                section: "optimizer".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be between 0 and 1 (exclusive)"),
            });
        }
    }
    if min > max {
        return Err(StockpilotError::ConfigInvalid {
            section: "optimizer".to_string(),
            key: min_key.to_string(),
            reason: format!("{min_key} must not exceed {max_key}"),
        });
    }
    Ok(())
}

fn validate_metric(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let raw = config
        .get_string("optimizer", "metric")
        .unwrap_or_else(|| "return".to_string());
    raw.parse::<OptimizeMetric>()
        .map(|_| ())
        .map_err(|reason| StockpilotError::ConfigInvalid {
            section: "optimizer".to_string(),
            key: "metric".to_string(),
            reason,
        })
}
