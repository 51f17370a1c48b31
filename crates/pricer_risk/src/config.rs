//! Engine configuration management
//!
//! Loads contract defaults and the settings of the Merton calibrator and
//! the Greek checker from TOML. Every table is optional; missing keys take
//! their defaults.
//!
//! ```toml
//! log_level = "debug"
//!
//! [defaults]
//! spot = 101.0
//! ttm = 1.0
//! instrument = "put"
//!
//! [merton]
//! volatility_upper = 10.0
//!
//! [merton.solver]
//! max_iterations = 200
//!
//! [greek_check]
//! tolerance = 1e-4
//! ```

use std::path::Path;
use std::str::FromStr;

use pricer_models::analytical::OptionParams;
use pricer_models::calibration::MertonConfig;
use pricer_models::instruments::{Instrument, InstrumentError, InstrumentType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::verification::GreekCheckConfig;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unrecognised log level name
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Contract defaults that do not build an instrument
    #[error("Invalid contract defaults: {0}")]
    InvalidDefaults(#[from] InstrumentError),

    /// Numeric setting outside its valid range
    #[error("Invalid setting {field} = {value}")]
    InvalidSetting {
        /// Dotted path of the setting
        field: String,
        /// Rejected value
        value: f64,
    },

    /// Unreadable or unparsable configuration
    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels for the tracing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Contract inputs used when a caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractDefaults {
    /// Spot price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Volatility
    pub volatility: f64,
    /// Time to maturity in years
    pub ttm: f64,
    /// Domestic rate
    pub rate: f64,
    /// Dividend yield
    pub dividend_yield: f64,
    /// Instrument type
    pub instrument: InstrumentType,
}

impl Default for ContractDefaults {
    fn default() -> Self {
        Self::from_params(OptionParams::default(), InstrumentType::Call)
    }
}

impl ContractDefaults {
    /// Defaults taken from a parameter set.
    pub fn from_params(params: OptionParams, instrument: InstrumentType) -> Self {
        Self {
            spot: params.spot,
            strike: params.strike,
            volatility: params.volatility,
            ttm: params.ttm,
            rate: params.rate,
            dividend_yield: params.dividend_yield,
            instrument,
        }
    }

    /// The defaults as model inputs.
    pub fn params(&self) -> OptionParams {
        OptionParams::new(
            self.spot,
            self.strike,
            self.volatility,
            self.ttm,
            self.rate,
            self.dividend_yield,
        )
    }

    /// The default instrument.
    pub fn instrument(&self) -> Result<Instrument, InstrumentError> {
        Instrument::new(self.params(), self.instrument)
    }
}

/// Engine configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskEngineConfig {
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Contract defaults
    pub defaults: ContractDefaults,
    /// Merton calibrator settings
    pub merton: MertonConfig,
    /// Greek checker settings
    pub greek_check: GreekCheckConfig,
}

impl Default for RiskEngineConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            defaults: ContractDefaults::default(),
            merton: MertonConfig::default(),
            greek_check: GreekCheckConfig::default(),
        }
    }
}

impl RiskEngineConfig {
    /// Create a new RiskEngineConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RiskEngineConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defaults.instrument()?;

        self.merton.validate().map_err(|e| match e {
            pricer_models::calibration::MertonError::InvalidInput { field, value } => {
                ConfigError::InvalidSetting {
                    field: format!("merton.{}", field),
                    value,
                }
            }
            other => ConfigError::FileError(other.to_string()),
        })?;

        let solver = &self.merton.solver;
        for (field, value) in [("tolerance", solver.tolerance), ("rel_tolerance", solver.rel_tolerance)] {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidSetting {
                    field: format!("merton.solver.{}", field),
                    value,
                });
            }
        }
        if solver.max_iterations == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "merton.solver.max_iterations".to_string(),
                value: 0.0,
            });
        }

        if let Some((field, value)) = self.greek_check.invalid_field() {
            return Err(ConfigError::InvalidSetting {
                field: format!("greek_check.{}", field),
                value,
            });
        }

        Ok(())
    }
}
