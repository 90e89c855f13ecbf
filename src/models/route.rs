// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route (track) model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::db::collections;
use crate::ids::IdGenerator;
use crate::models::activity::{ActivityKind, GeoPoint};
use crate::models::history::{insert_unique, remove_all};
use crate::models::{Entity, Reference};

/// A trackable path with start/end coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Route {
    /// Generated once, never regenerated
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "inicio")]
    #[validate(nested)]
    pub start: GeoPoint,
    #[serde(rename = "final")]
    #[validate(nested)]
    pub end: GeoPoint,
    /// Length in kilometres
    #[serde(rename = "longitud")]
    #[validate(range(min = 0.0))]
    pub length_km: f64,
    /// Elevation gain in metres
    #[serde(rename = "desnivel")]
    #[validate(range(min = 0.0))]
    pub elevation_gain: f64,
    /// Users who completed the route
    #[serde(rename = "usuarios")]
    pub users: Vec<String>,
    #[serde(rename = "actividad")]
    pub activity: ActivityKind,
    #[serde(rename = "calificacion")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
}

impl Route {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ids: &IdGenerator,
        name: impl Into<String>,
        start: GeoPoint,
        end: GeoPoint,
        length_km: f64,
        elevation_gain: f64,
        activity: ActivityKind,
        rating: f64,
    ) -> Self {
        Self {
            id: ids.next(),
            name: name.into(),
            start,
            end,
            length_km,
            elevation_gain,
            users: Vec::new(),
            activity,
            rating,
        }
    }

    /// Record that a user completed this route.
    pub fn add_user(&mut self, user_id: &str) {
        insert_unique(&mut self.users, user_id);
    }

    pub fn remove_user(&mut self, user_id: &str) {
        remove_all(&mut self.users, user_id);
    }

    pub fn completed_by(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u == user_id)
    }
}

impl Entity for Route {
    const COLLECTION: &'static str = collections::ROUTES;
    const KIND: &'static str = "route";
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "nombre",
        "inicio",
        "final",
        "longitud",
        "desnivel",
        "usuarios",
        "actividad",
        "calificacion",
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
        vec![Reference::many("usuarios", collections::USERS, &self.users)]
    }
}
