// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CRUD handlers shared by every entity collection.
//!
//! `nombre` takes precedence over `id` when both are given.

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::Lookup;
use crate::error::OpError;
use crate::models::Entity;
use crate::routes::{not_found, validation};
use crate::services::manager::{Manager, OperationKind, OpResult, ReadQuery};
use crate::services::population;
use crate::AppState;

/// Routes for one collection mounted at `path`.
pub fn routes<E: Entity>(path: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        path,
        get(read::<E>)
            .post(create::<E>)
            .delete(remove::<E>)
            .patch(update::<E>)
            .fallback(not_found),
    )
}

/// Key parameters accepted by every collection endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct KeyQuery {
    pub nombre: Option<String>,
    pub id: Option<String>,
    /// Resolve reference fields on reads
    #[serde(default)]
    pub populate: bool,
}

impl KeyQuery {
    pub fn new(nombre: Option<String>, id: Option<String>) -> Self {
        Self {
            nombre,
            id,
            populate: false,
        }
    }

    pub fn lookup(&self) -> Option<Lookup> {
        let present = |v: &Option<String>| v.as_ref().filter(|s| !s.is_empty()).cloned();
        present(&self.nombre)
            .map(Lookup::Name)
            .or_else(|| present(&self.id).map(Lookup::Id))
    }
}

async fn read<E: Entity>(State(state): State<Arc<AppState>>, Query(query): Query<KeyQuery>) -> Response {
    let manager = Manager::<E>::new(state.store.clone());
    let read_query = match query.lookup() {
        Some(lookup) => ReadQuery::One(lookup),
        None => ReadQuery::All,
    };

    let result = manager.read(&read_query).await;
    if !query.populate {
        return result.into_response();
    }

    let entities = match result.into_result() {
        Ok(entities) => entities,
        Err(e) => return OpResult::<()>::fail(OperationKind::Read, e).into_response(),
    };
    match population::populate_all(&state.store, &entities).await {
        Ok(docs) => OpResult::ok(OperationKind::Read, docs).into_response(),
        Err(e) => {
            tracing::error!(kind = E::KIND, error = %e, "Population failed");
            OpResult::<()>::fail(OperationKind::Read, e.into()).into_response()
        }
    }
}

async fn create<E: Entity>(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    const OP: OperationKind = OperationKind::Add;

    let mut entity: E = match validation::parse_payload(&body) {
        Ok(entity) => entity,
        Err(e) => return OpResult::<()>::fail(OP, e).into_response(),
    };
    entity.set_id(state.ids.next());

    let manager = Manager::<E>::new(state.store.clone());
    manager
        .create(&entity)
        .await
        .map(|_| entity)
        .into_response()
}

async fn remove<E: Entity>(State(state): State<Arc<AppState>>, Query(query): Query<KeyQuery>) -> Response {
    let Some(lookup) = query.lookup() else {
        return OpResult::<()>::fail(OperationKind::Remove, OpError::MissingKey).into_response();
    };
    Manager::<E>::new(state.store.clone())
        .delete(&lookup)
        .await
        .into_response()
}

async fn update<E: Entity>(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
    body: Bytes,
) -> Response {
    const OP: OperationKind = OperationKind::Update;

    let Some(lookup) = query.lookup() else {
        return OpResult::<()>::fail(OP, OpError::MissingKey).into_response();
    };
    let replacement: E = match validation::parse_payload(&body) {
        Ok(entity) => entity,
        Err(e) => return OpResult::<()>::fail(OP, e).into_response(),
    };

    Manager::<E>::new(state.store.clone())
        .update(&lookup, replacement)
        .await
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_wins_over_id() {
        let query = KeyQuery {
            nombre: Some("Ana".into()),
            id: Some("id-3".into()),
            populate: false,
        };
        assert_eq!(query.lookup(), Some(Lookup::Name("Ana".into())));
    }

    #[test]
    fn test_empty_values_are_absent() {
        let query = KeyQuery {
            nombre: Some(String::new()),
            id: Some("id-3".into()),
            populate: false,
        };
        assert_eq!(query.lookup(), Some(Lookup::Id("id-3".into())));
        assert_eq!(KeyQuery::default().lookup(), None);
    }
}
