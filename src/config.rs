// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the registration ledger | `./data` |
//! | `NONCE_TTL_SECS` | Lifetime of an unconsumed nonce | `300` |
//! | `NONCE_RATE_LIMIT` | Nonce requests per window per identity | `5` |
//! | `VERIFY_RATE_LIMIT` | Verify requests per window per identity | `10` |
//! | `REGISTER_RATE_LIMIT` | Register requests per window per identity | `4` |
//! | `RATE_LIMIT_WINDOW_MS` | Rate-limit window length | `60000` |
//! | `SWEEP_INTERVAL_SECS` | Interval of the expired-entry sweeper | `60` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;
use thiserror::Error;

use crate::storage::paths::DATA_ROOT;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const NONCE_TTL_SECS_ENV: &str = "NONCE_TTL_SECS";
pub const NONCE_RATE_LIMIT_ENV: &str = "NONCE_RATE_LIMIT";
pub const VERIFY_RATE_LIMIT_ENV: &str = "VERIFY_RATE_LIMIT";
pub const REGISTER_RATE_LIMIT_ENV: &str = "REGISTER_RATE_LIMIT";
pub const RATE_LIMIT_WINDOW_MS_ENV: &str = "RATE_LIMIT_WINDOW_MS";
pub const SWEEP_INTERVAL_SECS_ENV: &str = "SWEEP_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Per-endpoint request budgets sharing one window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub nonce: u32,
    pub verify: u32,
    pub register: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            nonce: 5,
            verify: 10,
            register: 4,
            window: Duration::milliseconds(60_000),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub nonce_ttl: Duration,
    pub rate_limits: RateLimitPolicy,
    pub sweep_interval: StdDuration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from(DATA_ROOT),
            nonce_ttl: Duration::seconds(300),
            rate_limits: RateLimitPolicy::default(),
            sweep_interval: StdDuration::from_secs(60),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let defaults_limits = defaults.rate_limits;

        let number = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(name) {
                None => Ok(default),
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { name, value }),
            }
        };
        let positive = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match number(name, default)? {
                0 => Err(ConfigError::Zero { name }),
                n => Ok(n),
            }
        };
        let limit = |name: &'static str, default: u32| -> Result<u32, ConfigError> {
            let value = positive(name, u64::from(default))?;
            u32::try_from(value).map_err(|_| ConfigError::InvalidNumber {
                name,
                value: value.to_string(),
            })
        };

        let delta = |name: &'static str,
                     default: i64,
                     make: fn(i64) -> Option<Duration>|
         -> Result<Duration, ConfigError> {
            let value = positive(name, default.unsigned_abs())?;
            i64::try_from(value)
                .ok()
                .and_then(make)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    name,
                    value: value.to_string(),
                })
        };

        let port = number(PORT_ENV, u64::from(defaults.port))?;
        let port = u16::try_from(port).map_err(|_| ConfigError::InvalidNumber {
            name: PORT_ENV,
            value: port.to_string(),
        })?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or(defaults.host),
            port,
            data_dir: lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            nonce_ttl: delta(
                NONCE_TTL_SECS_ENV,
                defaults.nonce_ttl.num_seconds(),
                Duration::try_seconds,
            )?,
            rate_limits: RateLimitPolicy {
                nonce: limit(NONCE_RATE_LIMIT_ENV, defaults_limits.nonce)?,
                verify: limit(VERIFY_RATE_LIMIT_ENV, defaults_limits.verify)?,
                register: limit(REGISTER_RATE_LIMIT_ENV, defaults_limits.register)?,
                window: delta(
                    RATE_LIMIT_WINDOW_MS_ENV,
                    defaults_limits.window.num_milliseconds(),
                    Duration::try_milliseconds,
                )?,
            },
            sweep_interval: StdDuration::from_secs(positive(
                SWEEP_INTERVAL_SECS_ENV,
                defaults.sweep_interval.as_secs(),
            )?),
            log_format,
        })
    }

    /// `host:port` string to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
