// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.
//!
//! Entities refer to each other by id only. Resolving a reference always
//! goes through the store (see [`crate::services::population`]).

pub mod activity;
pub mod challenge;
pub mod group;
pub mod history;
pub mod route;
pub mod stats;
pub mod user;

pub use activity::{ActivityKind, GeoPoint};
pub use challenge::Challenge;
pub use group::{Group, MemberTotals, RankingMetric};
pub use history::RouteHistory;
pub use route::Route;
pub use stats::{PeriodTotals, TrainingStats};
pub use user::User;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

/// A document kind stored in its own collection.
pub trait Entity:
    Serialize + DeserializeOwned + Validate + Clone + Send + Sync + std::fmt::Debug + 'static
{
    /// Store collection name.
    const COLLECTION: &'static str;
    /// Human-readable kind used in messages ("route", "user", ...).
    const KIND: &'static str;
    /// Properties an incoming payload must carry.
    const REQUIRED_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn name(&self) -> &str;

    /// Id-valued fields pointing at other collections.
    fn references(&self) -> Vec<Reference>;
}

/// One reference field of an entity, as stored in its document.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Document field name
    pub field: &'static str,
    /// Collection the ids live in
    pub collection: &'static str,
    pub ids: Vec<String>,
    /// Field holds a single id rather than a list
    pub single: bool,
}

impl Reference {
    pub fn many(field: &'static str, collection: &'static str, ids: &[String]) -> Self {
        Self {
            field,
            collection,
            ids: ids.to_vec(),
            single: false,
        }
    }

    pub fn one(field: &'static str, collection: &'static str, id: &str) -> Self {
        Self {
            field,
            collection,
            ids: vec![id.to_string()],
            single: true,
        }
    }
}
