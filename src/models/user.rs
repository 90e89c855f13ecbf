// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::db::collections;
use crate::ids::IdGenerator;
use crate::models::activity::ActivityKind;
use crate::models::history::{insert_unique, remove_all, RouteHistory};
use crate::models::stats::TrainingStats;
use crate::models::{Entity, Reference};

/// User profile stored in the `users` collection.
///
/// Relationship lists are only deduplicated on insertion; documents loaded
/// from the store are taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1))]
    pub name: String,
    /// Current activity
    #[serde(rename = "actividad")]
    pub activity: ActivityKind,
    #[serde(rename = "amigos")]
    pub friends: Vec<String>,
    #[serde(rename = "grupos")]
    pub groups: Vec<String>,
    #[serde(rename = "estadisticas")]
    #[validate(nested)]
    pub stats: TrainingStats,
    /// Routes completed
    #[serde(rename = "rutas")]
    pub routes: Vec<String>,
    #[serde(rename = "retos")]
    pub challenges: Vec<String>,
    #[serde(rename = "historicoRutas")]
    pub history: RouteHistory,
}

impl User {
    pub fn new(ids: &IdGenerator, name: impl Into<String>) -> Self {
        Self {
            id: ids.next(),
            name: name.into(),
            activity: ActivityKind::default(),
            friends: Vec::new(),
            groups: Vec::new(),
            stats: TrainingStats::new(),
            routes: Vec::new(),
            challenges: Vec::new(),
            history: RouteHistory::new(),
        }
    }

    pub fn set_activity(&mut self, activity: ActivityKind) {
        self.activity = activity;
    }

    pub fn add_friend(&mut self, user_id: &str) {
        insert_unique(&mut self.friends, user_id);
    }

    pub fn remove_friend(&mut self, user_id: &str) {
        remove_all(&mut self.friends, user_id);
    }

    pub fn join_group(&mut self, group_id: &str) {
        insert_unique(&mut self.groups, group_id);
    }

    pub fn leave_group(&mut self, group_id: &str) {
        remove_all(&mut self.groups, group_id);
    }

    pub fn add_route(&mut self, route_id: &str) {
        insert_unique(&mut self.routes, route_id);
    }

    pub fn remove_route(&mut self, route_id: &str) {
        remove_all(&mut self.routes, route_id);
    }

    pub fn add_challenge(&mut self, challenge_id: &str) {
        insert_unique(&mut self.challenges, challenge_id);
    }

    pub fn remove_challenge(&mut self, challenge_id: &str) {
        remove_all(&mut self.challenges, challenge_id);
    }

    pub fn add_history_entry(&mut self, date: &str, route_id: &str) {
        self.history.add_entry(date, route_id);
    }

    pub fn record_training(&mut self, distance: f64, elevation: f64) {
        self.stats.record(distance, elevation);
    }

    pub fn record_training_on(&mut self, distance: f64, elevation: f64, date: NaiveDate) {
        self.stats.record_on(distance, elevation, date);
    }
}

impl Entity for User {
    const COLLECTION: &'static str = collections::USERS;
    const KIND: &'static str = "user";
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "nombre",
        "actividad",
        "amigos",
        "grupos",
        "estadisticas",
        "rutas",
        "retos",
        "historicoRutas",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::many("amigos", collections::USERS, &self.friends),
            Reference::many("grupos", collections::GROUPS, &self.groups),
            Reference::many("rutas", collections::ROUTES, &self.routes),
            Reference::many("retos", collections::CHALLENGES, &self.challenges),
        ]
    }
}
