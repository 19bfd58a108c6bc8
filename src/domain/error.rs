//! Domain error types.

/// Top-level error type for stockpilot.
#[derive(Debug, thiserror::Error)]
pub enum StockpilotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {code}")]
    NoData { code: String },

    #[error("unsupported optimization metric: {metric}")]
    UnsupportedMetric { metric: String },

    #[error("optimization failed: {reason}")]
    OptimizationFailed { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockpilotError> for std::process::ExitCode {
    fn from(err: &StockpilotError) -> Self {
        let code: u8 = match err {
            StockpilotError::Io(_) => 1,
            StockpilotError::ConfigParse { .. }
            | StockpilotError::ConfigMissing { .. }
            | StockpilotError::ConfigInvalid { .. } => 2,
            StockpilotError::UnsupportedMetric { .. }
            | StockpilotError::OptimizationFailed { .. } => 4,
            StockpilotError::Data { .. } | StockpilotError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
