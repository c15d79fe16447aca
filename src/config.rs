use std::env;
use std::str::FromStr;

use crate::stores::{ErrorPolicy, StoreSettings};

/// Log output format for the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // API
    pub api_url: String,

    // Logging
    pub log_format: LogFormat,

    // Stores
    pub store_settings: StoreSettings,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        let project_create_errors = match env::var("TASKBOARD_PROJECT_CREATE_ERRORS") {
            Ok(value) => value
                .parse::<ErrorPolicy>()
                .map_err(|_| ConfigError::Invalid("TASKBOARD_PROJECT_CREATE_ERRORS"))?,
            Err(_) => ErrorPolicy::Swallow,
        };

        Ok(Self {
            // API
            api_url: env::var("TASKBOARD_API_URL")
                .map_err(|_| ConfigError::Missing("TASKBOARD_API_URL"))?,

            // Logging
            log_format: env::var("TASKBOARD_LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("TASKBOARD_LOG_FORMAT"))?,

            // Stores
            store_settings: StoreSettings {
                project_create_errors,
                ..Default::default()
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
