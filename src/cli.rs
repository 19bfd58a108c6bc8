//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::advice::{evaluate, PortfolioContext};
use crate::domain::config_validation::{
    validate_optimizer_config, validate_profile_config, validate_simulation_config,
};
use crate::domain::error::StockpilotError;
use crate::domain::optimizer::{optimize, OptimizeMetric, ParameterRanges};
use crate::domain::profile::{
    GeneralRules, Profile, QualityRules, TechnicalRules, ValuationRules,
};
use crate::domain::signal::{classify, SignalThresholds};
use crate::domain::simulator::{run as run_simulation, SimulationParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "stockpilot", about = "Rule-driven equity advisor and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest the signal strategy over one instrument
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// Grid-search delay/stop-loss/take-profit for the best return
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// Evaluate portfolio holdings (or screener candidates) against the profile
    Advise {
        #[arg(short, long)]
        config: PathBuf,
        /// Treat every row as a screening candidate: sell rules are skipped
        #[arg(long)]
        screen: bool,
    },
    /// List the instruments the data directory can serve
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file without running anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest { config, code } => run_backtest(&config, code.as_deref()),
        Command::Optimize { config, code } => run_optimize(&config, code.as_deref()),
        Command::Advise { config, screen } => run_advise(&config, screen),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StockpilotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Read `[simulation]` and `[signals]` into simulation parameters.
pub fn build_simulation_params(config: &dyn ConfigPort) -> SimulationParams {
    SimulationParams {
        start_capital: config.get_double("simulation", "start_capital", 10_000.0),
        transaction_cost: config.get_double("simulation", "transaction_cost", 5.0),
        signal_delay: config.get_int("simulation", "signal_delay", 1).max(0) as usize,
        stop_loss_pct: config.get_double("simulation", "stop_loss_pct", 0.05),
        take_profit_pct: config.get_double("simulation", "take_profit_pct", 0.10),
        thresholds: build_thresholds(config),
    }
}

pub fn build_thresholds(config: &dyn ConfigPort) -> SignalThresholds {
    SignalThresholds {
        rsi_oversold: config.get_double("signals", "rsi_oversold", 30.0),
        rsi_overbought: config.get_double("signals", "rsi_overbought", 70.0),
        min_volume_ratio: config.get_double("signals", "min_volume_ratio", 1.5),
    }
}

/// Read the four profile sections, falling back to the documented defaults.
pub fn build_profile(config: &dyn ConfigPort) -> Profile {
    Profile {
        general: GeneralRules {
            max_position_weight: config.get_double("general", "max_position_weight", 0.15),
            sell_above_target: config.get_double("general", "sell_above_target", 1.10),
            sell_pe_above: config.get_double("general", "sell_pe_above", 100.0),
            sell_debt_equity_above: config.get_double("general", "sell_debt_equity_above", 4.0),
        },
        technical: TechnicalRules {
            min_volume_ratio: config.get_double("technical", "min_volume_ratio", 1.2),
            trend_check: config.get_bool("technical", "trend_check", true),
            max_distance_from_high: config.get_double("technical", "max_distance_from_high", 0.15),
        },
        quality: QualityRules {
            min_return_on_equity: config.get_double("quality", "min_return_on_equity", 0.15),
            max_beta: config.get_double("quality", "max_beta", 1.2),
        },
        valuation: ValuationRules {
            min_upside: config.get_double("valuation", "min_upside", 0.25),
            max_pe: config.get_double("valuation", "max_pe", 25.0),
            max_pb: config.get_double("valuation", "max_pb", 2.5),
            max_ps: config.get_double("valuation", "max_ps", 4.0),
            max_debt_equity: config.get_double("valuation", "max_debt_equity", 1.5),
            min_profit_margin: config.get_double("valuation", "min_profit_margin", 0.10),
        },
    }
}

pub fn build_ranges(config: &dyn ConfigPort) -> ParameterRanges {
    ParameterRanges {
        delay: (
            config.get_int("optimizer", "delay_min", 0).max(0) as usize,
            config.get_int("optimizer", "delay_max", 3).max(0) as usize,
        ),
        stop_loss_pct: (
            config.get_double("optimizer", "stop_loss_min", 0.01),
            config.get_double("optimizer", "stop_loss_max", 0.10),
        ),
        take_profit_pct: (
            config.get_double("optimizer", "take_profit_min", 0.05),
            config.get_double("optimizer", "take_profit_max", 0.20),
        ),
    }
}

pub fn build_metric(config: &dyn ConfigPort) -> Result<OptimizeMetric, StockpilotError> {
    config
        .get_string("optimizer", "metric")
        .unwrap_or_else(|| "return".to_string())
        .parse::<OptimizeMetric>()
        .map_err(|reason| StockpilotError::ConfigInvalid {
            section: "optimizer".to_string(),
            key: "metric".to_string(),
            reason,
        })
}

pub fn resolve_code(code_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    if let Some(c) = code_override {
        return Some(c.to_uppercase());
    }
    config
        .get_string("data", "code")
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

fn missing_code_error() -> ExitCode {
    let err = StockpilotError::ConfigMissing {
        section: "data".to_string(),
        key: "code".to_string(),
    };
    eprintln!("error: {err} (use --code or set [data] code)");
    (&err).into()
}

fn build_data_adapter(config: &dyn ConfigPort) -> CsvAdapter {
    let base = config
        .get_string("data", "bars_dir")
        .unwrap_or_else(|| ".".to_string());
    let adapter = CsvAdapter::new(PathBuf::from(base));
    match config.get_string("data", "snapshot_file") {
        Some(name) => adapter.with_snapshot_file(&name),
        None => adapter,
    }
}

fn run_backtest(config_path: &PathBuf, code_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let code = match resolve_code(code_override, &adapter) {
        Some(c) => c,
        None => return missing_code_error(),
    };

    let params = build_simulation_params(&adapter);
    let data_port = build_data_adapter(&adapter);

    eprintln!("Fetching bars for {code}...");
    let bars = match data_port.fetch_bars(&code) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {}: {} bars", code, bars.len());

    let result = match run_simulation(&bars, &params) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Backtest: {code} ===");
    eprintln!("Start Capital:   {:.2}", result.start_capital);
    eprintln!("Final Capital:   {:.2}", result.final_capital);
    eprintln!("Return:          {:.2}%", result.return_pct);
    eprintln!("Trades:          {}", result.stats.total_trades);
    eprintln!("Win Rate:        {:.1}%", result.stats.win_rate_pct);
    eprintln!("Avg Win:         {:.2}", result.stats.avg_win);
    eprintln!("Avg Loss:        {:.2}", result.stats.avg_loss);

    for trade in &result.trades {
        println!(
            "{},{},{},{:.2},{:.2},{:.2},{}",
            trade.entry_date,
            trade.exit_date,
            trade.direction,
            trade.entry_price,
            trade.exit_price,
            trade.result,
            trade.exit_reason.label(trade.direction),
        );
    }

    ExitCode::SUCCESS
}

fn run_optimize(config_path: &PathBuf, code_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_optimizer_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let code = match resolve_code(code_override, &adapter) {
        Some(c) => c,
        None => return missing_code_error(),
    };

    let metric = match build_metric(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let params = build_simulation_params(&adapter);
    let ranges = build_ranges(&adapter);
    let data_port = build_data_adapter(&adapter);

    eprintln!("Fetching bars for {code}...");
    let bars = match data_port.fetch_bars(&code) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let cells = ranges.combinations().len();
    eprintln!("Sweeping {cells} parameter combinations...");

    match optimize(&bars, &params, &ranges, metric) {
        Ok(best) => {
            eprintln!("\n=== Best parameters: {code} ===");
            eprintln!("Signal Delay:    {}", best.params.signal_delay);
            eprintln!("Stop Loss:       {:.2}", best.params.stop_loss_pct);
            eprintln!("Take Profit:     {:.2}", best.params.take_profit_pct);
            eprintln!("Return:          {:.2}%", best.metric_value);
            println!(
                "{},{},{:.2},{:.2},{:.2}",
                code,
                best.params.signal_delay,
                best.params.stop_loss_pct,
                best.params.take_profit_pct,
                best.metric_value,
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_advise(config_path: &PathBuf, screen: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_profile_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let profile = build_profile(&adapter);
    let thresholds = build_thresholds(&adapter);
    let data_port = build_data_adapter(&adapter);

    let records = match data_port.fetch_snapshots() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if records.is_empty() {
        let err = StockpilotError::Data {
            reason: "snapshot file contains no rows".to_string(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    let total_value: f64 = records.iter().map(|r| r.position_value).sum();
    eprintln!(
        "Evaluating {} instruments ({})",
        records.len(),
        if screen { "screening" } else { "portfolio" },
    );

    for record in &records {
        let context = if screen {
            PortfolioContext::Screening
        } else {
            PortfolioContext::from_totals(record.position_value, total_value)
        };
        let advice = evaluate(&record.snapshot, &profile, &context);
        let signal = classify(&record.snapshot, &thresholds);

        match advice.breakdown {
            Some(b) => println!(
                "{},{},{}/{},{}/{},{}",
                record.ticker,
                advice.decision,
                b.quality_score,
                b.quality_threshold,
                b.value_score,
                b.value_threshold,
                signal,
            ),
            None => println!("{},{},,,{}", record.ticker, advice.decision, signal),
        }
    }

    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = build_data_adapter(&adapter);
    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No bar files found");
    } else {
        for symbol in &symbols {
            println!("{symbol}");
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for check in [
        validate_simulation_config(&adapter),
        validate_profile_config(&adapter),
        validate_optimizer_config(&adapter),
    ] {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Config is valid");
    ExitCode::SUCCESS
}
