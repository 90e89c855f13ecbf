// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide entity id generation.
//!
//! A single [`IdGenerator`] is created at startup and handed to every
//! constructor that needs a fresh identity. Clones share the same counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Prefix of every generated identifier.
pub const ID_PREFIX: &str = "id-";

/// Shared monotonic counter producing `id-N` identifiers.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counter: Arc<AtomicU64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `id-N` for the current counter value, then advance it.
    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{ID_PREFIX}{n}")
    }

    /// Overwrite the counter. Callers are responsible for not reusing ids.
    pub fn set_counter(&self, value: u64) {
        self.counter.store(value, Ordering::SeqCst);
    }

    /// Current counter value (the number the next id will carry).
    pub fn counter(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Move the counter past `id` if it was generated by this scheme.
    ///
    /// Used when restoring from persisted documents so that freshly
    /// generated ids never collide with stored ones.
    pub fn observe(&self, id: &str) {
        if let Some(n) = parse_sequence(id) {
            self.counter.fetch_max(n + 1, Ordering::SeqCst);
        }
    }
}

/// Extract `N` from an `id-N` identifier.
pub fn parse_sequence(id: &str) -> Option<u64> {
    id.strip_prefix(ID_PREFIX)?.parse().ok()
}
