// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route history keyed by date, plus set-like helpers for id lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes completed per date (`YYYY-MM-DD` → route ids, in completion order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(transparent)]
pub struct RouteHistory(BTreeMap<String, Vec<String>>);

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `route_id` to the list for `date`, creating it if needed.
    pub fn add_entry(&mut self, date: &str, route_id: &str) {
        self.0
            .entry(date.to_string())
            .or_default()
            .push(route_id.to_string());
    }

    pub fn routes_on(&self, date: &str) -> &[String] {
        self.0.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All `(date, route_id)` pairs, oldest date first.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(date, routes)| routes.iter().map(move |r| (date.as_str(), r.as_str())))
    }

    /// How many times `route_id` is recorded on `date`.
    pub fn count(&self, date: &str, route_id: &str) -> usize {
        self.routes_on(date).iter().filter(|r| *r == route_id).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Push `id` unless already present. Returns whether it was inserted.
pub(crate) fn insert_unique(ids: &mut Vec<String>, id: &str) -> bool {
    if ids.iter().any(|existing| existing == id) {
        return false;
    }
    ids.push(id.to_string());
    true
}

/// Remove every occurrence of `id`. Returns whether anything was removed.
pub(crate) fn remove_all(ids: &mut Vec<String>, id: &str) -> bool {
    let before = ids.len();
    ids.retain(|existing| existing != id);
    ids.len() != before
}
