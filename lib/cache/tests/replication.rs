// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Two nodes on one bus: a record resolved on node A becomes a local hit on
//! node B without B ever consulting its own origin.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use ordercache::bus::StubBus;
use ordercache::origin::{OriginFetcher, StubOrigin};
use ordercache::storage::{FilesystemStore, OrderStore};
use ordercache::{CacheCoordinator, CancellationToken, Order};

struct CountingOrigin {
    inner: StubOrigin,
    calls: AtomicUsize,
}

impl CountingOrigin {
    fn new() -> Self {
        Self {
            inner: StubOrigin::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OriginFetcher for CountingOrigin {
    async fn fetch(&self, key: &str) -> Result<Option<Order>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(key).await
    }
}

struct Node {
    coordinator: Arc<CacheCoordinator>,
    store: Arc<FilesystemStore>,
    origin: Arc<CountingOrigin>,
    cancel: CancellationToken,
    _root: tempfile::TempDir,
}

impl Node {
    async fn start(bus: &StubBus) -> Self {
        let root = tempfile::tempdir().unwrap();
        let store = Arc::new(FilesystemStore::new(root.path()));
        let origin = Arc::new(CountingOrigin::new());
        let coordinator = Arc::new(CacheCoordinator::new(
            store.clone(),
            origin.clone(),
            Arc::new(bus.clone()),
        ));

        let cancel = CancellationToken::new();
        tokio::spawn(
            coordinator
                .clone()
                .run_replication(Arc::new(bus.clone()), cancel.clone()),
        );
        // Let the wildcard subscription attach; the bus has no replay.
        tokio::task::yield_now().await;

        Self {
            coordinator,
            store,
            origin,
            cancel,
            _root: root,
        }
    }

    async fn wait_for(&self, key: &str) -> Order {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(order) = self.store.get(key).await.unwrap() {
                    return order;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("record {key:?} never replicated"))
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[tokio::test]
async fn test_peer_resolution_replicates_across_the_bus() {
    let bus = StubBus::default();
    let node_a = Node::start(&bus).await;
    let node_b = Node::start(&bus).await;

    // Node A resolves "7": miss, fetch, persist, publish.
    let resolved = node_a.coordinator.lookup("7").await.unwrap();
    assert_eq!(node_a.origin.calls(), 1);

    // The publication lands in node B's store without B fetching anything.
    let replicated = node_b.wait_for("7").await;
    assert_eq!(replicated, resolved);
    assert_eq!(node_b.origin.calls(), 0);

    // A lookup on B is now a pure local hit.
    let via_b = node_b.coordinator.lookup("7").await.unwrap();
    assert_eq!(via_b, resolved);
    assert_eq!(node_b.origin.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_cross_node_resolution_converges() {
    let bus = StubBus::default();
    let node_a = Node::start(&bus).await;
    let node_b = Node::start(&bus).await;

    // Both nodes miss simultaneously. The stub origin is deterministic per
    // key, so whichever publication arrives last writes the same value.
    let (from_a, from_b) = tokio::join!(
        node_a.coordinator.lookup("race"),
        node_b.coordinator.lookup("race"),
    );
    let from_a = from_a.unwrap();
    let from_b = from_b.unwrap();
    assert_eq!(from_a, from_b);

    let settled_a = node_a.wait_for("race").await;
    let settled_b = node_b.wait_for("race").await;
    assert_eq!(settled_a, from_a);
    assert_eq!(settled_b, from_b);
}
