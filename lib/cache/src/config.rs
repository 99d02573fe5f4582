// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Node configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file named
//! by `ORDERCACHE_CONFIG_PATH`, then `ORDERCACHE_`-prefixed environment
//! variables (e.g. `ORDERCACHE_BUS_URL`, `ORDERCACHE_HTTP_PORT`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable naming a TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "ORDERCACHE_CONFIG_PATH";

/// Prefix for configuration environment variables.
const ENV_PREFIX: &str = "ORDERCACHE_";

/// Everything externally supplied to a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Shared bus endpoint.
    pub bus_url: String,
    /// Address the query endpoint binds to.
    pub http_host: String,
    pub http_port: u16,
    /// Root directory for the durable store.
    pub storage_root: PathBuf,
    /// TLS material for the terminating layer in front of this node.
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
    /// Bound on a single origin fetch, in milliseconds.
    pub origin_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            bus_url: "nats://127.0.0.1:4222".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            storage_root: PathBuf::from("/var/lib/ordercache"),
            tls_cert_path: None,
            tls_key_path: None,
            origin_timeout_ms: 5_000,
        }
    }
}

impl CacheConfig {
    /// Load configuration from defaults, optional TOML file, and environment.
    pub fn from_env() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("failed to load configuration")
    }

    pub fn origin_timeout(&self) -> Duration {
        Duration::from_millis(self.origin_timeout_ms)
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
