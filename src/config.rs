// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. Startup fails
//! when the signing secret is missing or empty; a vault signing tokens
//! with a default key is worse than one that refuses to boot.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DOCVAULT_JWT_SECRET` | Token signing secret | Required, non-empty |
//! | `DOCVAULT_DATA_DIR` | Root directory for vault storage | `./data` |
//! | `DOCVAULT_MAX_UPLOAD_BYTES` | Maximum accepted upload size | `10485760` (10 MiB) |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::DATA_ROOT;

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "DOCVAULT_JWT_SECRET";
/// Environment variable name for the storage root directory.
pub const DATA_DIR_ENV: &str = "DOCVAULT_DATA_DIR";
/// Environment variable name for the upload size limit.
pub const MAX_UPLOAD_ENV: &str = "DOCVAULT_MAX_UPLOAD_BYTES";

/// Default maximum upload size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{JWT_SECRET_ENV} must be set to a non-empty value")]
    MissingJwtSecret,
    #[error("invalid value for {variable}: {detail}")]
    Invalid {
        variable: &'static str,
        detail: String,
    },
}

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub data_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DATA_ROOT));

        let max_upload_bytes = match lookup(MAX_UPLOAD_ENV) {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                variable: MAX_UPLOAD_ENV,
                detail: e.to_string(),
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        if max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                variable: MAX_UPLOAD_ENV,
                detail: "must be greater than zero".to_string(),
            });
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                variable: "PORT",
                detail: e.to_string(),
            })?,
            None => 8080,
        };

        Ok(Self {
            jwt_secret,
            data_dir,
            max_upload_bytes,
            host,
            port,
        })
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
