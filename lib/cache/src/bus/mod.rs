// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Publish/subscribe seam shared by all nodes.
//!
//! Publishing is fire-and-forget: the caller never awaits broker
//! acknowledgment, and delivery is at-least-once to subscribers that were
//! attached when the message was sent (no historical replay). Subject
//! patterns use NATS wildcards: `*` matches one token, `>` matches one or
//! more trailing tokens.

use anyhow::Result;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::BoxStream;

pub mod nats;
pub mod stub;

pub use nats::{NatsBus, NatsBusConfig};
pub use stub::StubBus;

/// Message received from a subscription.
#[derive(Debug, Clone)]
pub struct Message {
    /// The subject the message was published to.
    pub subject: String,
    /// The message payload.
    pub payload: Bytes,
}

/// A subscription stream that yields messages until dropped.
pub type Subscription = BoxStream<'static, Message>;

/// Fire-and-forget message publishing.
pub trait Publisher: Send + Sync {
    /// Enqueue `payload` for delivery to `subject`.
    ///
    /// Returns an error only if the publisher itself is gone; broker-side
    /// failures are logged in the background and never reach the caller.
    fn publish(&self, subject: &str, payload: Bytes) -> Result<()>;

    /// Wait until everything enqueued so far has been handed to the broker.
    fn flush(&self) -> BoxFuture<'static, Result<()>>;
}

/// Subscription to a subject pattern.
pub trait Subscriber: Send + Sync {
    /// Subscribe to `pattern`, returning the delivery stream.
    fn subscribe(&self, pattern: &str) -> BoxFuture<'static, Result<Subscription>>;
}
