// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group ranking attribution.
//!
//! A member's distance/elevation within a group is the sum of the routes in
//! the group's history that the member completed on that date, as recorded
//! in the member's own history. An entry the group recorded `n` times is
//! credited to a member at most `n` times. Routes that no longer resolve
//! and members without a user document count as zero.

use std::collections::{BTreeSet, HashMap};

use crate::db::{Lookup, Store};
use crate::error::StoreError;
use crate::models::{Entity, Group, MemberTotals, RankingMetric, Route, RouteHistory, User};

/// Resolve the group's history routes and member histories, then attribute.
pub async fn member_totals(store: &Store, group: &Group) -> Result<MemberTotals, StoreError> {
    let mut routes: HashMap<String, Option<Route>> = HashMap::new();
    for (_, route_id) in group.history.entries() {
        if !routes.contains_key(route_id) {
            let route: Option<Route> = store
                .find(Route::COLLECTION, &Lookup::Id(route_id.to_string()))
                .await?;
            if route.is_none() {
                tracing::debug!(group = %group.id, route_id, "History route no longer exists");
            }
            routes.insert(route_id.to_string(), route);
        }
    }

    let mut histories: HashMap<String, RouteHistory> = HashMap::new();
    if !group.history.is_empty() {
        for member in &group.members {
            let user: Option<User> = store
                .find(User::COLLECTION, &Lookup::Id(member.clone()))
                .await?;
            match user {
                Some(user) => {
                    histories.insert(member.clone(), user.history);
                }
                None => tracing::debug!(group = %group.id, member = %member, "Group member has no user document"),
            }
        }
    }

    Ok(attribute(group, &routes, &histories))
}

/// Pure attribution over already-resolved routes and member histories.
pub fn attribute(
    group: &Group,
    routes: &HashMap<String, Option<Route>>,
    histories: &HashMap<String, RouteHistory>,
) -> MemberTotals {
    let entries: BTreeSet<(&str, &str)> = group.history.entries().collect();

    let mut totals = MemberTotals::new();
    for member in &group.members {
        let Some(history) = histories.get(member) else {
            continue;
        };
        for &(date, route_id) in &entries {
            let Some(Some(route)) = routes.get(route_id) else {
                continue;
            };
            let rides = history
                .count(date, route_id)
                .min(group.history.count(date, route_id));
            for _ in 0..rides {
                totals.add(member, route.length_km, route.elevation_gain);
            }
        }
    }
    totals
}

/// Recompute `group.ranking` from store data.
pub async fn rerank(store: &Store, group: &mut Group, metric: RankingMetric) -> Result<(), StoreError> {
    let totals = member_totals(store, group).await?;
    group.rank_by(metric, &totals);
    tracing::debug!(group = %group.id, ?metric, ranking = ?group.ranking, "Ranking recomputed");
    Ok(())
}
