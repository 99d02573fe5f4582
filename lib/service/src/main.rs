// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Node entry point: wire the long-lived resources together, spawn the
//! replication listener, and serve the query endpoint until shutdown.

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use ordercache::bus::{NatsBus, NatsBusConfig};
use ordercache::origin::StubOrigin;
use ordercache::storage::FilesystemStore;
use ordercache::{logging, CacheConfig, CacheCoordinator};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = CacheConfig::from_env()?;
    info!(
        bus_url = %config.bus_url,
        storage_root = %config.storage_root.display(),
        "starting ordercache node"
    );

    let bus = NatsBus::connect(NatsBusConfig::new(config.bus_url.clone())).await?;
    let store = Arc::new(FilesystemStore::new(&config.storage_root));
    let origin = Arc::new(StubOrigin::new());

    let coordinator = Arc::new(
        CacheCoordinator::new(store, origin, Arc::new(bus.clone()))
            .with_origin_timeout(config.origin_timeout()),
    );

    let cancel_token = CancellationToken::new();

    let replication = tokio::spawn(
        coordinator
            .clone()
            .run_replication(Arc::new(bus), cancel_token.clone()),
    );

    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {e}");
            return;
        }
        info!("shutdown signal received");
        shutdown.cancel();
    });

    ordercache_service::serve(&config.http_addr(), coordinator, cancel_token.clone()).await?;

    cancel_token.cancel();
    match replication.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("replication listener failed: {e:#}"),
        Err(e) => warn!("replication listener panicked: {e}"),
    }
    info!("ordercache node stopped");
    Ok(())
}
