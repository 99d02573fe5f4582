// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! NATS-backed bus client.
//!
//! One connection per node, owned for the process lifetime. Publishes are
//! handed to a background task over a channel so the request path never
//! blocks on the broker; broker-side publish failures are logged there and
//! dropped, which is the contract [`Publisher`] promises.

use anyhow::{Context, Result};
use async_nats::Client;
use bytes::Bytes;
use flume::{Receiver, Sender};
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, StreamExt};
use tokio::sync::oneshot;
use tracing::{debug, error};

use super::{Message, Publisher, Subscriber, Subscription};

/// Connection settings for the shared bus.
#[derive(Debug, Clone)]
pub struct NatsBusConfig {
    /// Broker URL, e.g. `nats://127.0.0.1:4222`.
    pub server_url: String,
}

impl NatsBusConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

/// Command sent to the background publish task.
enum PublishCommand {
    Publish { subject: String, payload: Bytes },
    Flush { done: oneshot::Sender<Result<()>> },
}

/// NATS implementation of [`Publisher`] and [`Subscriber`].
#[derive(Clone)]
pub struct NatsBus {
    client: Client,
    tx: Sender<PublishCommand>,
}

impl NatsBus {
    /// Wrap an already-connected client, spawning the publish task.
    pub fn new(client: Client) -> Self {
        let (tx, rx) = flume::unbounded();
        tokio::spawn(Self::run_publish_loop(client.clone(), rx));
        Self { client, tx }
    }

    /// Connect to the broker and return a ready bus client.
    pub async fn connect(config: NatsBusConfig) -> Result<Self> {
        let client = async_nats::connect(&config.server_url)
            .await
            .with_context(|| format!("failed to connect to NATS at {}", config.server_url))?;
        debug!(server_url = %config.server_url, "connected to bus");
        Ok(Self::new(client))
    }

    async fn run_publish_loop(client: Client, rx: Receiver<PublishCommand>) {
        while let Ok(cmd) = rx.recv_async().await {
            match cmd {
                PublishCommand::Publish { subject, payload } => {
                    if let Err(e) = client.publish(subject.clone(), payload).await {
                        error!(%subject, "failed to publish record: {e}");
                    }
                }
                PublishCommand::Flush { done } => {
                    let result = client.flush().await.context("failed to flush bus");
                    // Receiver may have given up waiting.
                    let _ = done.send(result);
                }
            }
        }
    }
}

impl Publisher for NatsBus {
    fn publish(&self, subject: &str, payload: Bytes) -> Result<()> {
        self.tx
            .send(PublishCommand::Publish {
                subject: subject.to_string(),
                payload,
            })
            .map_err(|_| anyhow::anyhow!("bus publish task has terminated"))
    }

    fn flush(&self) -> BoxFuture<'static, Result<()>> {
        let (done_tx, done_rx) = oneshot::channel();
        let tx = self.tx.clone();

        async move {
            tx.send(PublishCommand::Flush { done: done_tx })
                .map_err(|_| anyhow::anyhow!("bus publish task has terminated"))?;
            done_rx
                .await
                .map_err(|_| anyhow::anyhow!("bus publish task has terminated"))?
        }
        .boxed()
    }
}

impl Subscriber for NatsBus {
    fn subscribe(&self, pattern: &str) -> BoxFuture<'static, Result<Subscription>> {
        let client = self.client.clone();
        let pattern = pattern.to_string();
        async move {
            let subscriber = client
                .subscribe(pattern.clone())
                .await
                .with_context(|| format!("failed to subscribe to {pattern}"))?;

            let stream: BoxStream<'static, Message> = subscriber
                .map(|msg| Message {
                    subject: msg.subject.to_string(),
                    payload: msg.payload,
                })
                .boxed();

            Ok(stream)
        }
        .boxed()
    }
}
