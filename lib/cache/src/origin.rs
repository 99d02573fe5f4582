// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Authoritative origin seam.
//!
//! Consulted only after a confirmed local miss. [`StubOrigin`] is a pure
//! deterministic function of the key, which is what makes concurrent
//! duplicate fetches harmless; the coordinator still coalesces them so a
//! real origin with quotas or side effects can be dropped in unchanged.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Order, OrderStatus};

/// Fetch from the origin of truth. `Ok(None)` means the origin has no
/// record for the key.
#[async_trait]
pub trait OriginFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Option<Order>>;
}

/// Deterministic stand-in for the authoritative source.
///
/// Every field is derived from the key alone, so any two nodes (or two
/// concurrent fetches on one node) resolve a key to the same record.
#[derive(Debug, Clone, Default)]
pub struct StubOrigin {
    /// Simulated fetch latency, mainly for timeout tests.
    latency: Option<Duration>,
}

const PRODUCTS: &[&str] = &["widget", "gadget", "sprocket", "flange", "gizmo"];

impl StubOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
        }
    }

    fn derive(key: &str) -> Order {
        let seed: u64 = key.bytes().fold(0u64, |acc, b| {
            acc.wrapping_mul(31).wrapping_add(u64::from(b))
        });
        Order {
            id: key.to_string(),
            customer: format!("customer-{key}"),
            product: PRODUCTS[(seed % PRODUCTS.len() as u64) as usize].to_string(),
            quantity: (seed % 9) as u32 + 1,
            status: OrderStatus::Confirmed,
        }
    }
}

#[async_trait]
impl OriginFetcher for StubOrigin {
    async fn fetch(&self, key: &str) -> Result<Option<Order>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(Some(Self::derive(key)))
    }
}
