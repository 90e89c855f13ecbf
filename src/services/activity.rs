// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route completion processing.
//!
//! Handles the workflow when a user completes a route:
//! 1. Resolve the user and the route
//! 2. Add the route to the user's routes and history, record the training
//! 3. Add the user to the route's `usuarios` and store the route and user
//! 4. Mirror history and training into every group the user belongs to,
//!    re-ranking each group by distance from the stored member histories
//!
//! Training is credited to the periods containing the completion date, so a
//! backdated completion does not count towards the current week.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::{Lookup, Store};
use crate::error::{OpError, ValidationIssue};
use crate::models::{Group, RankingMetric, Route, User};
use crate::services::manager::{Manager, OperationKind, OpResult};
use crate::services::ranking;
use crate::time_utils::format_history_date;

/// A route completion as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Route id
    #[serde(rename = "ruta")]
    pub route_id: String,
    /// History date (`YYYY-MM-DD`); today if absent
    #[serde(rename = "fecha")]
    pub date: Option<String>,
}

impl Completion {
    /// The completion date, or `today` when none was given.
    pub fn day(&self, today: NaiveDate) -> Result<NaiveDate, OpError> {
        let Some(date) = &self.date else {
            return Ok(today);
        };
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            OpError::Invalid(vec![ValidationIssue {
                instance_path: "/fecha".to_string(),
                keyword: "format".to_string(),
                params: json!({ "format": "date" }),
                message: "must match format \"date\"".to_string(),
            }])
        })
    }
}

/// Records route completions across users, routes and groups.
pub struct ActivityRecorder {
    store: Store,
    users: Manager<User>,
    routes: Manager<Route>,
    groups: Manager<Group>,
}

impl ActivityRecorder {
    pub fn new(store: Store) -> Self {
        Self {
            users: Manager::new(store.clone()),
            routes: Manager::new(store.clone()),
            groups: Manager::new(store.clone()),
            store,
        }
    }

    /// Record that the user matching `user` completed a route on `date`.
    pub async fn record_completion(&self, user: &Lookup, route_id: &str, date: NaiveDate) -> OpResult<String> {
        match self.process(user, route_id, date).await {
            Ok(message) => OpResult::ok(OperationKind::Update, message),
            Err(e) => {
                tracing::warn!(%user, route_id, %date, error = %e, "Completion not recorded");
                OpResult::fail(OperationKind::Update, e)
            }
        }
    }

    async fn process(&self, user_lookup: &Lookup, route_id: &str, date: NaiveDate) -> Result<String, OpError> {
        let mut user = self.users.get(user_lookup).await?;
        let mut route = self.routes.get(&Lookup::Id(route_id.to_string())).await?;
        let day = format_history_date(date);

        tracing::info!(
            user = %user.id,
            route = %route.id,
            date = %day,
            km = route.length_km,
            elevation = route.elevation_gain,
            "Recording route completion"
        );

        user.add_route(&route.id);
        user.add_history_entry(&day, &route.id);
        user.record_training_on(route.length_km, route.elevation_gain, date);

        route.add_user(&user.id);
        self.routes
            .update(&Lookup::Id(route.id.clone()), route.clone())
            .await
            .into_result()?;

        // Stored before the groups so re-ranking sees this completion
        self.users
            .update(&Lookup::Id(user.id.clone()), user.clone())
            .await
            .into_result()?;

        for group_id in &user.groups {
            let mut group = match self.groups.get(&Lookup::Id(group_id.clone())).await {
                Ok(group) => group,
                Err(OpError::NotFound { .. }) => {
                    tracing::warn!(user = %user.id, group = %group_id, "User references a missing group");
                    continue;
                }
                Err(e) => return Err(e),
            };

            group.add_history_entry(&day, &route.id);
            group.record_training_on(route.length_km, route.elevation_gain, date);
            ranking::rerank(&self.store, &mut group, RankingMetric::Distance).await?;

            self.groups
                .update(&Lookup::Id(group.id.clone()), group)
                .await
                .into_result()?;
        }

        Ok(format!(
            "The user with id {} completed route {} on {}",
            user.id, route.id, day
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdGenerator;
    use crate::models::{ActivityKind, GeoPoint, PeriodTotals};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed() -> (Store, IdGenerator, User, Route, Group) {
        let store = Store::memory();
        let ids = IdGenerator::new();

        let route = Route::new(
            &ids,
            "Roque Nublo",
            GeoPoint::new(27.97, -15.61),
            GeoPoint::new(27.96, -15.60),
            8.0,
            450.0,
            ActivityKind::Running,
            4.5,
        );
        let mut user = User::new(&ids, "Ana");
        let group = Group::new(&ids, "Grupo", user.id.clone(), vec![user.id.clone()]);
        user.join_group(&group.id);

        Manager::<Route>::new(store.clone()).create(&route).await;
        Manager::<User>::new(store.clone()).create(&user).await;
        Manager::<Group>::new(store.clone()).create(&group).await;

        (store, ids, user, route, group)
    }

    #[test]
    fn test_completion_day() {
        let today = day(2024, 6, 10);
        let completion = |date: Option<&str>| Completion {
            route_id: "id-0".into(),
            date: date.map(str::to_string),
        };

        assert_eq!(completion(None).day(today).unwrap(), today);
        assert_eq!(completion(Some("1999-01-01")).day(today).unwrap(), day(1999, 1, 1));

        for bad in ["not-a-date", "2024-02-30", "", "01/05/2024"] {
            match completion(Some(bad)).day(today) {
                Err(OpError::Invalid(issues)) => {
                    assert_eq!(issues[0].instance_path, "/fecha");
                    assert_eq!(issues[0].keyword, "format");
                }
                other => panic!("{bad:?} accepted: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_completion_updates_all_documents() {
        let (store, _ids, user, route, group) = seed().await;
        let recorder = ActivityRecorder::new(store.clone());

        let result = recorder
            .record_completion(&Lookup::Id(user.id.clone()), &route.id, day(2024, 6, 10))
            .await;
        assert!(result.is_success(), "{:?}", result.error());

        let user = Manager::<User>::new(store.clone())
            .get(&Lookup::Id(user.id))
            .await
            .unwrap();
        assert_eq!(user.routes, [route.id.clone()]);
        assert_eq!(user.history.routes_on("2024-06-10"), [route.id.clone()]);

        let route = Manager::<Route>::new(store.clone())
            .get(&Lookup::Id(route.id))
            .await
            .unwrap();
        assert!(route.completed_by(&user.id));

        let group = Manager::<Group>::new(store.clone())
            .get(&Lookup::Id(group.id))
            .await
            .unwrap();
        assert_eq!(group.history.routes_on("2024-06-10"), [route.id.clone()]);

        let totals = ranking::member_totals(&store, &group).await.unwrap();
        assert_eq!(totals.get(&user.id).distance, 8.0);
    }

    #[tokio::test]
    async fn test_completion_of_unknown_route_fails() {
        let (store, _ids, user, _route, _group) = seed().await;
        let recorder = ActivityRecorder::new(store);

        let result = recorder
            .record_completion(&Lookup::Id(user.id), "id-404", day(2024, 6, 10))
            .await;
        assert!(matches!(result.error(), Some(OpError::NotFound { kind: "route", .. })));
    }

    #[tokio::test]
    async fn test_missing_group_is_skipped() {
        let (store, _ids, mut user, route, _group) = seed().await;
        user.join_group("id-999");
        Manager::<User>::new(store.clone())
            .update(&Lookup::Id(user.id.clone()), user.clone())
            .await;

        let recorder = ActivityRecorder::new(store);
        let result = recorder
            .record_completion(&Lookup::Name("Ana".into()), &route.id, day(2024, 6, 11))
            .await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_backdated_completion_leaves_current_stats() {
        let (store, _ids, user, route, group) = seed().await;
        let recorder = ActivityRecorder::new(store.clone());

        let result = recorder
            .record_completion(&Lookup::Id(user.id.clone()), &route.id, day(1999, 1, 1))
            .await;
        assert!(result.is_success(), "{:?}", result.error());
        assert_eq!(
            result.output().unwrap(),
            &format!("The user with id {} completed route {} on 1999-01-01", user.id, route.id)
        );

        let user = Manager::<User>::new(store.clone())
            .get(&Lookup::Id(user.id))
            .await
            .unwrap();
        assert_eq!(user.history.routes_on("1999-01-01"), [route.id.clone()]);
        assert_eq!(user.stats.weekly_totals(), PeriodTotals::default());
        assert_eq!(user.stats.yearly_totals(), PeriodTotals::default());

        let group = Manager::<Group>::new(store)
            .get(&Lookup::Id(group.id))
            .await
            .unwrap();
        assert_eq!(group.stats.weekly_totals(), PeriodTotals::default());
        assert_eq!(group.ranking, [user.id.clone()]);
    }
}
