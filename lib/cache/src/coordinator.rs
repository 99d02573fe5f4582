// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! The cache coordination state machine.
//!
//! Per lookup: `CHECK_LOCAL -> (HIT: DONE) | (MISS: FETCH_ORIGIN -> PERSIST
//! -> PUBLISH -> DONE)`. Two rules carry all the correctness weight:
//!
//! 1. A record is persisted before it is announced, so a concurrent lookup
//!    on this node that observes the announcement can never then observe a
//!    miss.
//! 2. Every store write — miss path and replication path alike — happens
//!    under that key's lock, giving single-writer-per-key. The same lock
//!    coalesces concurrent misses: the second caller re-checks the store
//!    after acquiring it and finds the first caller's write, so the origin
//!    sees one fetch per key (single-flight).
//!
//! Bus failures stay contained here. A publish error after persistence only
//! degrades peer freshness and is logged; an undecodable delivery is logged
//! and dropped without disturbing the subscription.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bus::{Publisher, Subscriber};
use crate::error::CacheError;
use crate::model::{validate_key, Order};
use crate::origin::OriginFetcher;
use crate::storage::OrderStore;
use crate::subject::{key_from_subject, order_subject, ORDERS_WILDCARD};

/// Default bound on an origin fetch.
pub const DEFAULT_ORIGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-key async locks. Entries live for the process lifetime, matching the
/// cache-forever lifecycle of the records they guard.
#[derive(Default)]
struct KeyLocks {
    locks: parking_lot::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Orchestrates lookup, miss handling, persistence, and bus propagation.
///
/// Constructed once at startup around the node's long-lived resources and
/// shared via `Arc` between the request path and the replication listener.
pub struct CacheCoordinator {
    store: Arc<dyn OrderStore>,
    origin: Arc<dyn OriginFetcher>,
    publisher: Arc<dyn Publisher>,
    locks: KeyLocks,
    origin_timeout: Duration,
}

impl CacheCoordinator {
    pub fn new(
        store: Arc<dyn OrderStore>,
        origin: Arc<dyn OriginFetcher>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            store,
            origin,
            publisher,
            locks: KeyLocks::default(),
            origin_timeout: DEFAULT_ORIGIN_TIMEOUT,
        }
    }

    /// Override the origin fetch bound.
    pub fn with_origin_timeout(mut self, timeout: Duration) -> Self {
        self.origin_timeout = timeout;
        self
    }

    /// Resolve `key` to an order, consulting the local store first and the
    /// origin only on a confirmed miss.
    pub async fn lookup(&self, key: &str) -> Result<Order, CacheError> {
        validate_key(key)?;

        // CHECK_LOCAL: the hit path has no side effects beyond the read.
        if let Some(order) = self.read_local(key).await? {
            debug!(%key, "cache hit");
            return Ok(order);
        }

        let lock = self.locks.lock_for(key);
        let _guard = lock.lock().await;

        // A concurrent miss may have resolved the key while we waited.
        if let Some(order) = self.read_local(key).await? {
            debug!(%key, "cache hit after coalescing");
            return Ok(order);
        }

        // FETCH_ORIGIN
        debug!(%key, "cache miss, fetching from origin");
        let fetched = tokio::time::timeout(self.origin_timeout, self.origin.fetch(key))
            .await
            .map_err(|_| CacheError::OriginTimeout {
                key: key.to_string(),
                timeout: self.origin_timeout,
            })?
            .map_err(|source| CacheError::Origin {
                key: key.to_string(),
                source,
            })?;
        let order = fetched.ok_or_else(|| CacheError::NotFound {
            key: key.to_string(),
        })?;

        // PERSIST: must be durable before anyone hears about it.
        self.store
            .put(key, &order)
            .await
            .map_err(|source| CacheError::Storage {
                key: key.to_string(),
                source,
            })?;

        // PUBLISH: fire-and-forget; the record is already durable, so a
        // failure here must not fail the lookup.
        self.announce(key, &order);

        info!(%key, "resolved from origin and announced");
        Ok(order)
    }

    async fn read_local(&self, key: &str) -> Result<Option<Order>, CacheError> {
        self.store
            .get(key)
            .await
            .map_err(|source| CacheError::Storage {
                key: key.to_string(),
                source,
            })
    }

    fn announce(&self, key: &str, order: &Order) {
        let payload = match serde_json::to_vec(order) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(%key, "failed to encode record for announcement: {e}");
                return;
            }
        };
        if let Err(e) = self
            .publisher
            .publish(&order_subject(key), Bytes::from(payload))
        {
            warn!(%key, "failed to announce record: {e}");
        }
    }

    /// Apply a record delivered over the bus.
    ///
    /// Runs under the same per-key lock as the miss path. The node's own
    /// announcements arrive here too and land as idempotent overwrites.
    async fn apply_replicated(&self, key: &str, order: Order) -> Result<(), CacheError> {
        validate_key(key)?;

        let lock = self.locks.lock_for(key);
        let _guard = lock.lock().await;

        self.store
            .put(key, &order)
            .await
            .map_err(|source| CacheError::Storage {
                key: key.to_string(),
                source,
            })?;
        debug!(%key, "applied replicated record");
        Ok(())
    }

    /// Consume the wildcard subscription until cancelled or the stream ends.
    ///
    /// Per-message failures (foreign subject, undecodable payload, storage
    /// write error) are logged and the message dropped; the loop stays live
    /// for subsequent deliveries.
    pub async fn run_replication(
        self: Arc<Self>,
        subscriber: Arc<dyn Subscriber>,
        cancel_token: CancellationToken,
    ) -> anyhow::Result<()> {
        let mut subscription = subscriber.subscribe(ORDERS_WILDCARD).await?;
        info!(pattern = ORDERS_WILDCARD, "replication listener started");

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("replication listener stopping");
                    return Ok(());
                }
                msg = subscription.next() => {
                    let Some(msg) = msg else {
                        warn!("replication subscription ended");
                        return Ok(());
                    };

                    let Some(key) = key_from_subject(&msg.subject) else {
                        warn!(subject = %msg.subject, "dropping message with unrecognized subject");
                        continue;
                    };
                    let order: Order = match serde_json::from_slice(&msg.payload) {
                        Ok(order) => order,
                        Err(e) => {
                            warn!(%key, "dropping undecodable record: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = self.apply_replicated(key, order).await {
                        warn!(%key, "failed to apply replicated record: {e}");
                    }
                }
            }
        }
    }
}
