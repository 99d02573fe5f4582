// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! The cached order entity.
//!
//! The cache layer treats the record opaquely; only the key participates in
//! addressing (file names, bus subjects), which is why keys are validated
//! here rather than at each consumer.

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Maximum accepted key length in bytes.
pub const MAX_KEY_LENGTH: usize = 128;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
}

/// A single order record as served to callers and replicated between nodes.
///
/// All fields are carried verbatim through persistence and bus transport;
/// a `put` then `get` (or publish then delivery) round-trips every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub product: String,
    pub quantity: u32,
    pub status: OrderStatus,
}

/// Validate a lookup key before it reaches file paths or bus subjects.
///
/// Keys must be 1..=[`MAX_KEY_LENGTH`] bytes of `[A-Za-z0-9_-]`. Anything
/// else is rejected up front: a dot would splice extra subject segments and
/// a slash would escape the storage namespace.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() || key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey { key: key.to_string() });
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(CacheError::InvalidKey { key: key.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_round_trips_through_json() {
        let order = Order {
            id: "42".to_string(),
            customer: "ada".to_string(),
            product: "widget".to_string(),
            quantity: 3,
            status: OrderStatus::Shipped,
        };

        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }

    #[test]
    fn test_valid_keys() {
        for key in ["42", "order-7", "A_b-3"] {
            assert!(validate_key(key).is_ok(), "expected {key:?} to be valid");
        }
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH)).is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["", "a/b", "a.b", "a b", "../etc"] {
            assert!(validate_key(key).is_err(), "expected {key:?} to be rejected");
        }
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }
}
