//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `P2P_TRADE_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `P2P_TRADE_CONFIG_FILE` | Config file path | `config.toml` |
//! | `P2P_TRADE_TDS_RATE_BPS` | Tax withheld at source, basis points | `100` |
//! | `P2P_TRADE_COMMISSION_RATE_BPS` | Platform commission, basis points | `20` |
//! | `P2P_TRADE_EXPIRY_MINUTES` | Payment window length | `15` |
//! | `P2P_TRADE_SWEEP_INTERVAL_SECS` | Expiry sweep period | `30` |
//! | `P2P_TRADE_LOG_LEVEL` | Log level | `info` |
//! | `P2P_TRADE_LOG_FORMAT` | Log format (json/pretty) | `json` |
//!
//! # Examples
//!
//! ```ignore
//! use p2p_trade::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("expiry window: {} minutes", config.trade.expiry_minutes);
//! ```

use crate::application::services::TradePolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

// ============================================================================
// Trade Configuration
// ============================================================================

/// Trade policy configuration.
///
/// Rates are expressed in basis points (1 bps = 0.01%) so the config file
/// never carries floating-point money values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Tax withheld at source, in basis points of the gross fiat amount.
    #[serde(default = "default_tds_rate_bps")]
    pub tds_rate_bps: u32,

    /// Platform commission, in basis points of the gross fiat amount.
    #[serde(default = "default_commission_rate_bps")]
    pub commission_rate_bps: u32,

    /// Payment window length in minutes.
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,

    /// Minor-unit digits of the fiat currency.
    #[serde(default = "default_fiat_scale")]
    pub fiat_scale: u32,

    /// Expiry sweep period in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            tds_rate_bps: default_tds_rate_bps(),
            commission_rate_bps: default_commission_rate_bps(),
            expiry_minutes: default_expiry_minutes(),
            fiat_scale: default_fiat_scale(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl TradeConfig {
    /// Converts the configuration into the policy applied at trade creation.
    #[must_use]
    pub fn policy(&self) -> TradePolicy {
        TradePolicy {
            tds_rate: Decimal::new(i64::from(self.tds_rate_bps), 4),
            commission_rate: Decimal::new(i64::from(self.commission_rate_bps), 4),
            expiry_minutes: self.expiry_minutes,
            fiat_scale: self.fiat_scale,
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Trade policy configuration.
    #[serde(default)]
    pub trade: TradeConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Try to load from config file if it exists
        let config_path =
            std::env::var("P2P_TRADE_CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        // Trade configuration
        if let Ok(bps) = std::env::var("P2P_TRADE_TDS_RATE_BPS") {
            if let Ok(v) = bps.parse() {
                self.trade.tds_rate_bps = v;
            }
        }
        if let Ok(bps) = std::env::var("P2P_TRADE_COMMISSION_RATE_BPS") {
            if let Ok(v) = bps.parse() {
                self.trade.commission_rate_bps = v;
            }
        }
        if let Ok(minutes) = std::env::var("P2P_TRADE_EXPIRY_MINUTES") {
            if let Ok(v) = minutes.parse() {
                self.trade.expiry_minutes = v;
            }
        }
        if let Ok(secs) = std::env::var("P2P_TRADE_SWEEP_INTERVAL_SECS") {
            if let Ok(v) = secs.parse() {
                self.trade.sweep_interval_secs = v;
            }
        }

        // Logging configuration
        if let Ok(level) = std::env::var("P2P_TRADE_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(format) = std::env::var("P2P_TRADE_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Service configuration
        if let Ok(name) = std::env::var("P2P_TRADE_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(env) = std::env::var("P2P_TRADE_ENVIRONMENT") {
            self.environment = env;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trade.tds_rate_bps > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "trade.tds_rate_bps".to_string(),
                message: "rate cannot exceed 10000 bps (100%)".to_string(),
            });
        }
        if self.trade.commission_rate_bps > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "trade.commission_rate_bps".to_string(),
                message: "rate cannot exceed 10000 bps (100%)".to_string(),
            });
        }
        if self.trade.expiry_minutes < 1 {
            return Err(ConfigError::InvalidValue {
                field: "trade.expiry_minutes".to_string(),
                message: "payment window must be at least one minute".to_string(),
            });
        }
        if self.trade.fiat_scale > 9 {
            return Err(ConfigError::InvalidValue {
                field: "trade.fiat_scale".to_string(),
                message: "fiat scale must be at most 9".to_string(),
            });
        }
        if self.trade.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "trade.sweep_interval_secs".to_string(),
                message: "sweep interval must be positive".to_string(),
            });
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_tds_rate_bps() -> u32 {
    100
}

fn default_commission_rate_bps() -> u32 {
    20
}

fn default_expiry_minutes() -> i64 {
    15
}

fn default_fiat_scale() -> u32 {
    2
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "p2p-trade".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}
