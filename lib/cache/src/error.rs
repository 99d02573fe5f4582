// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Typed errors at the coordinator boundary.
//!
//! Store, bus, and origin seams return `anyhow::Result`; the coordinator
//! classifies failures into this taxonomy before they reach a caller. Bus
//! errors never appear here: inbound delivery failures are logged and the
//! message dropped, and a publish failure after the record is durable only
//! degrades peer freshness, so neither may fail a lookup.

use std::time::Duration;

/// Error returned from a lookup.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The key is malformed; rejected before any I/O.
    #[error("invalid key {key:?}")]
    InvalidKey { key: String },

    /// Local store read or write failed. Never treated as a miss.
    #[error("storage failure for key {key:?}")]
    Storage {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The origin has no record for this key.
    #[error("order {key:?} not found at origin")]
    NotFound { key: String },

    /// The origin fetch itself failed.
    #[error("origin fetch failed for key {key:?}")]
    Origin {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The origin fetch exceeded the configured bound.
    #[error("origin fetch for key {key:?} timed out after {timeout:?}")]
    OriginTimeout { key: String, timeout: Duration },
}

impl CacheError {
    /// Whether the error maps to "no such order" rather than a node fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}
