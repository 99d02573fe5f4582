// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Filesystem-backed order store.
//!
//! One JSON file per key under `<root>/orders/`. Writes go to a temporary
//! sibling first and are renamed into place, so a crash mid-write never
//! leaves a torn record behind a valid file name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::OrderStore;
use crate::model::{validate_key, Order};

const ORDERS_NAMESPACE: &str = "orders";

/// Durable store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    orders_dir: PathBuf,
}

impl FilesystemStore {
    /// Create a store rooted at `root`. The directory tree is created lazily
    /// on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            orders_dir: root.as_ref().join(ORDERS_NAMESPACE),
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.orders_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl OrderStore for FilesystemStore {
    async fn get(&self, key: &str) -> Result<Option<Order>> {
        validate_key(key)?;

        let path = self.record_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read record {}", path.display()))
            }
        };

        let order: Order = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to decode record {}", path.display()))?;
        Ok(Some(order))
    }

    async fn put(&self, key: &str, order: &Order) -> Result<()> {
        validate_key(key)?;

        tokio::fs::create_dir_all(&self.orders_dir)
            .await
            .with_context(|| {
                format!("failed to create orders dir {}", self.orders_dir.display())
            })?;

        let bytes = serde_json::to_vec(order).context("failed to encode record")?;

        let path = self.record_path(key);
        let tmp_path = self.orders_dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .with_context(|| format!("failed to write record {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("failed to commit record {}", path.display()))?;

        Ok(())
    }
}
