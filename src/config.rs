use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::models::DEFAULT_ANNUAL_DEMAND;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
pub const DEFAULT_FORECAST_HORIZON: u32 = 3;
pub const DEFAULT_ORDERING_COST: f64 = 50.0;
pub const DEFAULT_HOLDING_COST_RATE: f64 = 0.2;
pub const DEFAULT_DELIVERY_NOISE_STD: f64 = 1.0;
pub const DEFAULT_DEFECT_NOISE_STD: f64 = 0.5;
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// Analytics engine configuration with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Days projected by a demand forecast when the caller gives no horizon
    #[serde(default = "default_forecast_horizon")]
    #[validate(range(min = 1, max = 365))]
    pub forecast_horizon: u32,

    /// Fixed cost of placing one replenishment order
    #[serde(default = "default_ordering_cost")]
    #[validate(range(min = 0.0))]
    pub ordering_cost: f64,

    /// Yearly holding cost as a fraction of unit price
    #[serde(default = "default_holding_cost_rate")]
    #[validate(range(min = 0.0))]
    pub holding_cost_rate: f64,

    /// Annual demand for products without one
    #[serde(default = "default_annual_demand")]
    #[validate(range(min = 0))]
    pub default_annual_demand: i64,

    /// Standard deviation of the delivery-time perturbation
    #[serde(default = "default_delivery_noise_std")]
    #[validate(range(min = 0.0))]
    pub delivery_noise_std: f64,

    /// Standard deviation of the defect-rate perturbation
    #[serde(default = "default_defect_noise_std")]
    #[validate(range(min = 0.0))]
    pub defect_noise_std: f64,

    /// Seed for supplier feature noise; unset means a fresh entropy source per call
    #[serde(default)]
    pub noise_seed: Option<u64>,

    /// Rows included in a file analysis preview
    #[serde(default = "default_head_rows")]
    #[validate(range(min = 1, max = 1000))]
    pub head_rows: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            forecast_horizon: default_forecast_horizon(),
            ordering_cost: default_ordering_cost(),
            holding_cost_rate: default_holding_cost_rate(),
            default_annual_demand: default_annual_demand(),
            delivery_noise_std: default_delivery_noise_std(),
            defect_noise_std: default_defect_noise_std(),
            noise_seed: None,
            head_rows: default_head_rows(),
        }
    }
}

impl AnalyticsConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_forecast_horizon() -> u32 {
    DEFAULT_FORECAST_HORIZON
}

fn default_ordering_cost() -> f64 {
    DEFAULT_ORDERING_COST
}

fn default_holding_cost_rate() -> f64 {
    DEFAULT_HOLDING_COST_RATE
}

fn default_annual_demand() -> i64 {
    DEFAULT_ANNUAL_DEMAND
}

fn default_delivery_noise_std() -> f64 {
    DEFAULT_DELIVERY_NOISE_STD
}

fn default_defect_noise_std() -> f64 {
    DEFAULT_DEFECT_NOISE_STD
}

fn default_head_rows() -> usize {
    DEFAULT_HEAD_ROWS
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => {
            let mut err = ValidationError::new("invalid_log_level");
            err.message = Some("Log level must be one of: trace, debug, info, warn, error".into());
            Err(err)
        }
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("scm_analytics={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads analytics configuration from the default `config` directory.
pub fn load_config() -> Result<AnalyticsConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Loads analytics configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (`{dir}/default.toml`)
/// 3. Environment-specific config (`{dir}/{env}.toml`)
/// 4. Environment variables (`APP__*`)
pub fn load_config_from(dir: &Path) -> Result<AnalyticsConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            dir.display()
        );
    }

    let config = Config::builder()
        .set_default("environment", run_env.clone())?
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(&run_env).to_string_lossy()).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AnalyticsConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
