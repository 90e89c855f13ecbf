// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity kind and geolocation shared by routes, users and challenges.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Kind of activity a route or challenge is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityKind {
    #[serde(rename = "Bicicleta")]
    Cycling,
    #[serde(rename = "Correr")]
    Running,
}

impl Default for ActivityKind {
    fn default() -> Self {
        ActivityKind::Running
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeoPoint {
    #[serde(rename = "latitud")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
