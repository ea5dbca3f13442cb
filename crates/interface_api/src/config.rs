//! API configuration

use serde::Deserialize;

use core_kernel::CoreError;
use infra_db::StoreConfig;

/// Prefix of the environment variables read by [`ApiConfig::from_env`]
pub const ENV_PREFIX: &str = "CLAIMS";

/// API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or filter directive
    pub log_level: String,
    /// Claims table name
    pub table_name: String,
    /// Months looked back by unfiltered claim listings
    pub default_window_months: u32,
    /// Longest date range, in months, a listing without a member may span
    pub max_range_months: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            table_name: "claims".to_string(),
            default_window_months: 12,
            max_range_months: 120,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `CLAIMS_*` environment variables over defaults
    pub fn from_env() -> Result<Self, CoreError> {
        let defaults = Self::default();

        let config: Self = config::Config::builder()
            .set_default("host", defaults.host)
            .and_then(|b| b.set_default("port", i64::from(defaults.port)))
            .and_then(|b| b.set_default("log_level", defaults.log_level))
            .and_then(|b| b.set_default("table_name", defaults.table_name))
            .and_then(|b| {
                b.set_default("default_window_months", i64::from(defaults.default_window_months))
            })
            .and_then(|b| b.set_default("max_range_months", i64::from(defaults.max_range_months)))
            .map_err(|e| CoreError::configuration(e.to_string()))?
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.table_name.trim().is_empty() {
            return Err(CoreError::configuration("table_name must not be empty"));
        }
        if self.default_window_months == 0 {
            return Err(CoreError::configuration(
                "default_window_months must be at least 1",
            ));
        }
        if self.max_range_months < self.default_window_months {
            return Err(CoreError::configuration(
                "max_range_months must not be below default_window_months",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Storage settings derived from this configuration
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.table_name.clone())
            .default_window_months(self.default_window_months)
    }
}
