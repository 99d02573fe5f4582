// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Durable per-node order persistence.
//!
//! The store is the only state shared between the request path and the
//! replication listener; both write through the coordinator's per-key locks,
//! so implementations only need to be safe under concurrent access to
//! *different* keys.

use anyhow::Result;
use async_trait::async_trait;

use crate::model::Order;

mod filesystem;
mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

/// Key-addressed order persistence.
///
/// A missing entry is `Ok(None)`, never an error; errors mean the store
/// itself failed and must surface to the caller rather than masquerade as a
/// miss. `put` fully replaces any prior value for the key.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Read the persisted record for `key`.
    async fn get(&self, key: &str) -> Result<Option<Order>>;

    /// Persist `order` under `key`, overwriting any prior record.
    async fn put(&self, key: &str, order: &Order) -> Result<()>;
}
