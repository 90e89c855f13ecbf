// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory backend for local development and tests.
//!
//! Documents are kept as JSON values in insertion order, one list per
//! collection. Each collection lives behind a DashMap shard lock, so an
//! insert's existence check and write are atomic.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::db::Lookup;
use crate::error::StoreError;

type Collection = Vec<(String, Value)>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(doc_id: &str, doc: &Value, lookup: &Lookup) -> bool {
        match lookup {
            Lookup::Id(id) => doc_id == id,
            Lookup::Name(_) => doc.get(lookup.field()).and_then(Value::as_str) == Some(lookup.value()),
        }
    }

    pub fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        lookup: &Lookup,
    ) -> Result<Option<T>, StoreError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(None);
        };
        docs.iter()
            .find(|(doc_id, doc)| Self::matches(doc_id, doc, lookup))
            .map(|(_, doc)| serde_json::from_value(doc.clone()))
            .transpose()
            .map_err(StoreError::from)
    }

    pub fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        docs.iter()
            .map(|(_, doc)| serde_json::from_value(doc.clone()).map_err(StoreError::from))
            .collect()
    }

    pub fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        doc: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|(doc_id, _)| doc_id == id) {
            return Err(StoreError::Conflict(format!("{collection}/{id}")));
        }
        docs.push((id.to_string(), value));
        Ok(())
    }

    pub fn delete(&self, collection: &str, lookup: &Lookup) -> Result<bool, StoreError> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs
            .iter()
            .position(|(doc_id, doc)| Self::matches(doc_id, doc, lookup))
        {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
