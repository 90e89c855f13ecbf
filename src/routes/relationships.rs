// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Endpoints that touch more than one collection: route completions,
//! group membership and group ranking.

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::Lookup;
use crate::error::OpError;
use crate::models::RankingMetric;
use crate::routes::collections::KeyQuery;
use crate::routes::{not_found, validation};
use crate::services::{ActivityRecorder, Completion, MembershipService, OperationKind, OpResult};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/completions",
            post(record_completion).fallback(not_found),
        )
        .route(
            "/groups/members",
            post(add_member).delete(remove_member).fallback(not_found),
        )
        .route("/groups/ranking", post(rank_group).fallback(not_found))
}

/// Record a completed route for the user selected by `id`/`nombre`.
async fn record_completion(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
    body: Bytes,
) -> Response {
    const OP: OperationKind = OperationKind::Update;

    let Some(user) = query.lookup() else {
        return OpResult::<()>::fail(OP, OpError::MissingKey).into_response();
    };
    let completion: Completion = match validation::parse_json(&body, "completion") {
        Ok(completion) => completion,
        Err(e) => return OpResult::<()>::fail(OP, e).into_response(),
    };

    let date = match completion.day(Local::now().date_naive()) {
        Ok(date) => date,
        Err(e) => return OpResult::<()>::fail(OP, e).into_response(),
    };

    ActivityRecorder::new(state.store.clone())
        .record_completion(&user, &completion.route_id, date)
        .await
        .into_response()
}

#[derive(Debug, Deserialize)]
struct MemberQuery {
    nombre: Option<String>,
    id: Option<String>,
    usuario: Option<String>,
}

impl MemberQuery {
    fn keys(&self) -> Result<(Lookup, String), OpError> {
        let group = KeyQuery::new(self.nombre.clone(), self.id.clone())
            .lookup()
            .ok_or(OpError::MissingKey)?;
        let user = self
            .usuario
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or(OpError::MissingKey)?;
        Ok((group, user))
    }
}

async fn add_member(State(state): State<Arc<AppState>>, Query(query): Query<MemberQuery>) -> Response {
    match query.keys() {
        Ok((group, user)) => MembershipService::new(state.store.clone())
            .join(&group, &user)
            .await
            .into_response(),
        Err(e) => OpResult::<()>::fail(OperationKind::Update, e).into_response(),
    }
}

async fn remove_member(State(state): State<Arc<AppState>>, Query(query): Query<MemberQuery>) -> Response {
    match query.keys() {
        Ok((group, user)) => MembershipService::new(state.store.clone())
            .leave(&group, &user)
            .await
            .into_response(),
        Err(e) => OpResult::<()>::fail(OperationKind::Update, e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct RankingQuery {
    nombre: Option<String>,
    id: Option<String>,
    #[serde(default)]
    por: RankingMetric,
}

async fn rank_group(State(state): State<Arc<AppState>>, Query(query): Query<RankingQuery>) -> Response {
    let Some(group) = KeyQuery::new(query.nombre, query.id).lookup() else {
        return OpResult::<()>::fail(OperationKind::Update, OpError::MissingKey).into_response();
    };
    MembershipService::new(state.store.clone())
        .rerank(&group, query.por)
        .await
        .into_response()
}
