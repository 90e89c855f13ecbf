// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Destravate: sports-tracking backend for routes, users, groups and
//! challenges.
//!
//! This crate provides the REST API that validates incoming documents and
//! stores them in a document database, plus the training statistics and
//! group rankings derived from completed routes.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use ids::IdGenerator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub ids: IdGenerator,
}
