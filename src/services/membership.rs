// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group membership and ranking maintenance.
//!
//! Membership is stored on both sides (`Group::members`, `User::groups`);
//! both documents are rewritten on every change.

use crate::db::{Lookup, Store};
use crate::error::OpError;
use crate::models::{Group, RankingMetric, User};
use crate::services::manager::{Manager, OperationKind, OpResult};
use crate::services::ranking;

pub struct MembershipService {
    store: Store,
    users: Manager<User>,
    groups: Manager<Group>,
}

impl MembershipService {
    pub fn new(store: Store) -> Self {
        Self {
            users: Manager::new(store.clone()),
            groups: Manager::new(store.clone()),
            store,
        }
    }

    /// Add a user to a group. Returns the new ranking.
    pub async fn join(&self, group: &Lookup, user_id: &str) -> OpResult<Vec<String>> {
        wrap(self.try_join(group, user_id).await)
    }

    /// Remove a user from a group. Returns the new ranking.
    pub async fn leave(&self, group: &Lookup, user_id: &str) -> OpResult<Vec<String>> {
        wrap(self.try_leave(group, user_id).await)
    }

    /// Recompute and store a group's ranking. Returns it.
    pub async fn rerank(&self, group: &Lookup, metric: RankingMetric) -> OpResult<Vec<String>> {
        wrap(self.try_rerank(group, metric).await)
    }

    async fn try_join(&self, group_lookup: &Lookup, user_id: &str) -> Result<Vec<String>, OpError> {
        let mut group = self.groups.get(group_lookup).await?;
        let mut user = self.users.get(&Lookup::Id(user_id.to_string())).await?;

        let totals = ranking::member_totals(&self.store, &group).await?;
        group.add_member(&user.id, &totals);
        user.join_group(&group.id);

        tracing::info!(group = %group.id, user = %user.id, "Member joined group");
        self.save(group, Some(user)).await
    }

    async fn try_leave(&self, group_lookup: &Lookup, user_id: &str) -> Result<Vec<String>, OpError> {
        let mut group = self.groups.get(group_lookup).await?;
        if !group.is_member(user_id) {
            return Err(OpError::NotFound {
                kind: "member",
                key: format!("id {user_id}"),
            });
        }

        let totals = ranking::member_totals(&self.store, &group).await?;
        group.remove_member(user_id, &totals);

        // A stale member id may point at a user that no longer exists.
        let user = match self.users.get(&Lookup::Id(user_id.to_string())).await {
            Ok(mut user) => {
                user.leave_group(&group.id);
                Some(user)
            }
            Err(OpError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        tracing::info!(group = %group.id, user = user_id, "Member left group");
        self.save(group, user).await
    }

    async fn try_rerank(&self, group_lookup: &Lookup, metric: RankingMetric) -> Result<Vec<String>, OpError> {
        let mut group = self.groups.get(group_lookup).await?;
        ranking::rerank(&self.store, &mut group, metric).await?;
        self.save(group, None).await
    }

    async fn save(&self, group: Group, user: Option<User>) -> Result<Vec<String>, OpError> {
        let ranking = group.ranking.clone();
        self.groups
            .update(&Lookup::Id(group.id.clone()), group)
            .await
            .into_result()?;
        if let Some(user) = user {
            self.users
                .update(&Lookup::Id(user.id.clone()), user)
                .await
                .into_result()?;
        }
        Ok(ranking)
    }
}

fn wrap(result: Result<Vec<String>, OpError>) -> OpResult<Vec<String>> {
    match result {
        Ok(ranking) => OpResult::ok(OperationKind::Update, ranking),
        Err(e) => OpResult::fail(OperationKind::Update, e),
    }
}
