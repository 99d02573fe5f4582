// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Bus subject naming for order replication.
//!
//! Records travel on `cache.orders.<key>`; nodes subscribe to the wildcard
//! `cache.orders.*`. The key is always recovered from the subject, never
//! from the payload, so addressing cannot be spoofed by message content.
//!
//! Patterns use NATS semantics: `*` matches exactly one token, `>` matches
//! one or more trailing tokens.

/// Subject prefix for order records.
pub const ORDERS_PREFIX: &str = "cache.orders";

/// Wildcard pattern covering every order subject.
pub const ORDERS_WILDCARD: &str = "cache.orders.*";

/// Build the subject a record for `key` is published on.
pub fn order_subject(key: &str) -> String {
    format!("{ORDERS_PREFIX}.{key}")
}

/// Extract the key from an order subject.
///
/// Returns `None` unless the subject is exactly `cache.orders.<key>` with a
/// non-empty final token.
pub fn key_from_subject(subject: &str) -> Option<&str> {
    let rest = subject.strip_prefix(ORDERS_PREFIX)?.strip_prefix('.')?;
    if rest.is_empty() || rest.contains('.') {
        return None;
    }
    Some(rest)
}

/// Whether `subject` matches the subscription `pattern`.
///
/// `*` matches a single token; `>` matches one or more tokens and must be
/// the final pattern token. Used by the in-memory bus; NATS applies the
/// same rules server-side.
pub fn subject_matches(pattern: &str, subject: &str) -> bool {
    let mut pattern_tokens = pattern.split('.');
    let mut subject_tokens = subject.split('.');

    loop {
        match (pattern_tokens.next(), subject_tokens.next()) {
            (None, None) => return true,
            (Some(">"), Some(_)) => return true,
            (Some("*"), Some(_)) => continue,
            (Some(p), Some(s)) if p == s => continue,
            _ => return false,
        }
    }
}
