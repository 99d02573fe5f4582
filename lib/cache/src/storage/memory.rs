// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! In-memory order store for tests and embedding.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::OrderStore;
use crate::model::{validate_key, Order};

/// Non-durable store backed by a `HashMap`. Cloning shares the map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Order>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Order>> {
        validate_key(key)?;
        Ok(self.records.read().get(key).cloned())
    }

    async fn put(&self, key: &str, order: &Order) -> Result<()> {
        validate_key(key)?;
        self.records.write().insert(key.to_string(), order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    #[tokio::test]
    async fn test_memory_round_trip() {
        let store = MemoryStore::new();
        let order = Order {
            id: "1".to_string(),
            customer: "lin".to_string(),
            product: "cable".to_string(),
            quantity: 2,
            status: OrderStatus::Delivered,
        };

        store.put("1", &order).await.unwrap();
        assert_eq!(store.get("1").await.unwrap(), Some(order));
        assert_eq!(store.get("2").await.unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
