// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Bus-coordinated read-through cache for order lookups.
//!
//! Each node answers lookups from a durable local store, falls back to the
//! authoritative origin on a confirmed miss, and announces freshly resolved
//! records on a shared NATS bus so that peers subscribed to the same subject
//! space can serve future lookups without their own origin round-trip.
//!
//! The central piece is [`coordinator::CacheCoordinator`]; everything else is
//! a seam it coordinates: [`storage::OrderStore`], [`bus::Publisher`] /
//! [`bus::Subscriber`], and [`origin::OriginFetcher`].

pub use anyhow::{Context as ErrorContext, Error, Result};

pub mod bus;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod model;
pub mod origin;
pub mod storage;
pub mod subject;

pub use config::CacheConfig;
pub use coordinator::CacheCoordinator;
pub use error::CacheError;
pub use model::{Order, OrderStatus};
pub use tokio_util::sync::CancellationToken;
