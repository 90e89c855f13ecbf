// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training group model and member ranking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::db::collections;
use crate::ids::IdGenerator;
use crate::models::history::{insert_unique, remove_all, RouteHistory};
use crate::models::stats::{PeriodTotals, TrainingStats};
use crate::models::{Entity, Reference};

/// Metric used to order the group ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankingMetric {
    #[default]
    #[serde(rename = "km")]
    Distance,
    #[serde(rename = "desnivel")]
    Elevation,
}

/// Distance/elevation attributed to each member within a group.
///
/// Members with no entry count as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberTotals(HashMap<String, PeriodTotals>);

impl MemberTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, member_id: &str, distance: f64, elevation: f64) {
        let totals = self.0.entry(member_id.to_string()).or_default();
        totals.distance += distance;
        totals.elevation += elevation;
    }

    pub fn get(&self, member_id: &str) -> PeriodTotals {
        self.0.get(member_id).copied().unwrap_or_default()
    }

    fn value(&self, member_id: &str, metric: RankingMetric) -> f64 {
        let totals = self.get(member_id);
        match metric {
            RankingMetric::Distance => totals.distance,
            RankingMetric::Elevation => totals.elevation,
        }
    }
}

/// A named collection of users with shared statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "miembrosID")]
    pub members: Vec<String>,
    #[serde(rename = "propietarioID")]
    pub owner: String,
    #[serde(rename = "estadisticas")]
    #[validate(nested)]
    pub stats: TrainingStats,
    /// Member ids, best first
    pub ranking: Vec<String>,
    #[serde(rename = "rutasFav")]
    pub favorite_routes: Vec<String>,
    #[serde(rename = "historicoRutas")]
    pub history: RouteHistory,
}

impl Group {
    pub fn new(
        ids: &IdGenerator,
        name: impl Into<String>,
        owner: impl Into<String>,
        members: Vec<String>,
    ) -> Self {
        let mut group = Self {
            id: ids.next(),
            name: name.into(),
            members,
            owner: owner.into(),
            stats: TrainingStats::new(),
            ranking: Vec::new(),
            favorite_routes: Vec::new(),
            history: RouteHistory::new(),
        };
        if !group.members.is_empty() {
            group.rank_by(RankingMetric::Distance, &MemberTotals::new());
        }
        group
    }

    /// Add a member and re-rank by distance.
    pub fn add_member(&mut self, user_id: &str, totals: &MemberTotals) {
        if insert_unique(&mut self.members, user_id) {
            self.rank_by(RankingMetric::Distance, totals);
        }
    }

    /// Remove a member and re-rank by distance.
    pub fn remove_member(&mut self, user_id: &str, totals: &MemberTotals) {
        remove_all(&mut self.members, user_id);
        self.rank_by(RankingMetric::Distance, totals);
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Order members by descending `metric`. Ties keep member order.
    pub fn rank_by(&mut self, metric: RankingMetric, totals: &MemberTotals) {
        let mut ranking = self.members.clone();
        ranking.sort_by(|a, b| {
            totals
                .value(b, metric)
                .total_cmp(&totals.value(a, metric))
        });
        self.ranking = ranking;
    }

    pub fn add_favorite_route(&mut self, route_id: &str) {
        insert_unique(&mut self.favorite_routes, route_id);
    }

    pub fn remove_favorite_route(&mut self, route_id: &str) {
        remove_all(&mut self.favorite_routes, route_id);
    }

    pub fn add_history_entry(&mut self, date: &str, route_id: &str) {
        self.history.add_entry(date, route_id);
    }

    pub fn record_training_on(&mut self, distance: f64, elevation: f64, date: NaiveDate) {
        self.stats.record_on(distance, elevation, date);
    }
}

impl Entity for Group {
    const COLLECTION: &'static str = collections::GROUPS;
    const KIND: &'static str = "group";
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "nombre",
        "miembrosID",
        "propietarioID",
        "estadisticas",
        "ranking",
        "rutasFav",
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
            Reference::many("miembrosID", collections::USERS, &self.members),
            Reference::one("propietarioID", collections::USERS, &self.owner),
            Reference::many("ranking", collections::USERS, &self.ranking),
            Reference::many("rutasFav", collections::ROUTES, &self.favorite_routes),
        ]
    }
}
