// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! In-memory bus for tests and single-process deployments.
//!
//! All messages flow through one broadcast channel; each subscription
//! filters by its own subject pattern, so wildcard subscriptions behave the
//! same as against a real broker. Cloning shares the channel: clones handed
//! to several coordinators form a shared fabric, standing in for nodes on
//! one bus.

use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{FutureExt, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use super::{Message, Publisher, Subscriber, Subscription};
use crate::subject::subject_matches;

const DEFAULT_CAPACITY: usize = 256;

/// In-memory implementation of [`Publisher`] and [`Subscriber`].
#[derive(Clone)]
pub struct StubBus {
    tx: Arc<broadcast::Sender<Message>>,
}

impl Default for StubBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl StubBus {
    /// Create a bus whose slow subscribers lag after `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx: Arc::new(tx) }
    }
}

impl Publisher for StubBus {
    fn publish(&self, subject: &str, payload: Bytes) -> Result<()> {
        let msg = Message {
            subject: subject.to_string(),
            payload,
        };
        // No receivers is fine; delivery only covers current subscribers.
        let _ = self.tx.send(msg);
        Ok(())
    }

    fn flush(&self) -> BoxFuture<'static, Result<()>> {
        // In-memory delivery has nothing in flight.
        async { Ok(()) }.boxed()
    }
}

impl Subscriber for StubBus {
    fn subscribe(&self, pattern: &str) -> BoxFuture<'static, Result<Subscription>> {
        let rx = self.tx.subscribe();
        let pattern = pattern.to_string();

        let stream: BoxStream<'static, Message> = BroadcastStream::new(rx)
            .filter_map(move |result| {
                let pattern = pattern.clone();
                async move {
                    match result {
                        Ok(msg) if subject_matches(&pattern, &msg.subject) => Some(msg),
                        _ => None,
                    }
                }
            })
            .boxed();

        async move { Ok(stream) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wildcard_subscription_receives_matching_subjects() {
        let bus = StubBus::default();
        let mut sub = bus.subscribe("cache.orders.*").await.unwrap();

        bus.publish("cache.orders.42", Bytes::from("a")).unwrap();
        bus.publish("cache.invoices.42", Bytes::from("b")).unwrap();
        bus.publish("cache.orders.7", Bytes::from("c")).unwrap();

        let first = sub.next().await.unwrap();
        assert_eq!(first.subject, "cache.orders.42");
        let second = sub.next().await.unwrap();
        assert_eq!(second.subject, "cache.orders.7");
    }

    #[tokio::test]
    async fn test_all_subscribers_receive_each_message() {
        let bus = StubBus::default();
        let mut sub1 = bus.subscribe("cache.orders.*").await.unwrap();
        let mut sub2 = bus.subscribe("cache.orders.9").await.unwrap();

        bus.publish("cache.orders.9", Bytes::from("x")).unwrap();

        assert_eq!(sub1.next().await.unwrap().payload.as_ref(), b"x");
        assert_eq!(sub2.next().await.unwrap().payload.as_ref(), b"x");
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscribers() {
        let bus = StubBus::default();
        bus.publish("cache.orders.1", Bytes::from("early")).unwrap();

        let mut sub = bus.subscribe("cache.orders.*").await.unwrap();
        bus.publish("cache.orders.2", Bytes::from("late")).unwrap();

        let msg = sub.next().await.unwrap();
        assert_eq!(msg.subject, "cache.orders.2");
    }
}
