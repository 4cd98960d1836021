//! Runtime configuration
//!
//! Everything is read from the environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::measurement::MeasurementSystem;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid HAVWTR_MEASUREMENT '{0}': expected imperial/imp or metric/met")]
    InvalidMeasurement(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// REST API base URL; network tools fail when unset
    pub api_base_url: Option<String>,
    pub access_token: Option<String>,
    /// Measurement system of the signed-in account
    pub measurement: MeasurementSystem,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let measurement = match non_empty_var("HAVWTR_MEASUREMENT") {
            Some(value) => MeasurementSystem::from_str(&value)
                .ok_or(ConfigError::InvalidMeasurement(value))?,
            None => MeasurementSystem::default(),
        };

        Ok(Self {
            database_path: database_path(),
            api_base_url: non_empty_var("HAVWTR_API_BASE_URL"),
            access_token: non_empty_var("HAVWTR_ACCESS_TOKEN"),
            measurement,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get the database path from environment or use `<project>/data/havwtr.db`
pub fn database_path() -> PathBuf {
    std::env::var("HAVWTR_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path.push("havwtr.db");
            path
        })
}
