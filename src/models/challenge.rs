// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::db::collections;
use crate::ids::IdGenerator;
use crate::models::activity::ActivityKind;
use crate::models::history::{insert_unique, remove_all};
use crate::models::{Entity, Reference};

/// A goal made of routes, with participating users and a running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Challenge {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "rutas")]
    pub routes: Vec<String>,
    #[serde(rename = "actividad")]
    pub activity: ActivityKind,
    #[validate(range(min = 0.0))]
    pub total: f64,
    #[serde(rename = "usuarios")]
    pub users: Vec<String>,
}

impl Challenge {
    pub fn new(
        ids: &IdGenerator,
        name: impl Into<String>,
        routes: Vec<String>,
        activity: ActivityKind,
        users: Vec<String>,
    ) -> Self {
        Self {
            id: ids.next(),
            name: name.into(),
            routes,
            activity,
            total: 0.0,
            users,
        }
    }

    pub fn add_route(&mut self, route_id: &str) {
        insert_unique(&mut self.routes, route_id);
    }

    pub fn remove_route(&mut self, route_id: &str) {
        remove_all(&mut self.routes, route_id);
    }

    pub fn add_user(&mut self, user_id: &str) {
        insert_unique(&mut self.users, user_id);
    }

    pub fn remove_user(&mut self, user_id: &str) {
        remove_all(&mut self.users, user_id);
    }
}

impl Entity for Challenge {
    const COLLECTION: &'static str = collections::CHALLENGES;
    const KIND: &'static str = "challenge";
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["nombre", "rutas", "actividad", "total", "usuarios"];

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
            Reference::many("rutas", collections::ROUTES, &self.routes),
            Reference::many("usuarios", collections::USERS, &self.users),
        ]
    }
}
