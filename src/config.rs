//! Runtime configuration.
//!
//! Values come from defaults, then the environment, then (in the binary)
//! command-line flags.

use std::env;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::fare::{FareOptions, IdleBilling};

pub const WORKERS_VAR: &str = "FARE_WORKERS";
pub const TIMEZONE_VAR: &str = "FARE_TIMEZONE";
pub const IDLE_BILLING_VAR: &str = "FARE_IDLE_BILLING";
pub const DISTANCE_CACHE_VAR: &str = "FARE_DISTANCE_CACHE";

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 3;

#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub fare: FareOptions,
    /// Threads in the per-run worker pool.
    pub workers: usize,
    /// Share a distance cache between workers during a run.
    pub cache_distances: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            fare: FareOptions::default(),
            workers: DEFAULT_WORKERS,
            cache_distances: true,
        }
    }
}

impl EstimatorConfig {
    /// Defaults overridden by `FARE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(WORKERS_VAR) {
            config.workers = parse_workers(&value)?;
        }
        if let Some(value) = lookup(TIMEZONE_VAR) {
            config.fare.time_zone = parse_time_zone(&value)?;
        }
        if let Some(value) = lookup(IDLE_BILLING_VAR) {
            config.fare.idle_billing = parse_idle_billing(&value)?;
        }
        if let Some(value) = lookup(DISTANCE_CACHE_VAR) {
            config.cache_distances = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: DISTANCE_CACHE_VAR,
                        value,
                    });
                }
            };
        }

        Ok(config)
    }
}

pub fn parse_workers(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(workers) if workers > 0 => Ok(workers),
        _ => Err(ConfigError::InvalidWorkers {
            key: WORKERS_VAR,
            value: value.to_string(),
        }),
    }
}

pub fn parse_time_zone(value: &str) -> Result<Tz, ConfigError> {
    Tz::from_str(value.trim()).map_err(|_| ConfigError::UnknownTimeZone(value.to_string()))
}

/// Case-insensitive; accepts the serde names of [`IdleBilling`].
pub fn parse_idle_billing(value: &str) -> Result<IdleBilling, ConfigError> {
    let lowered = value.trim().to_ascii_lowercase();
    let deserializer: StrDeserializer<'_, ValueError> = lowered.as_str().into_deserializer();
    IdleBilling::deserialize(deserializer).map_err(|_| ConfigError::InvalidValue {
        key: IDLE_BILLING_VAR,
        value: value.to_string(),
    })
}
