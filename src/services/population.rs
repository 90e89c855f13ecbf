// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reference population for display.
//!
//! Replaces the id-valued fields of an entity's document with the
//! referenced documents. Ids that no longer resolve are left as plain
//! strings.

use futures_util::{stream, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::db::{Lookup, Store};
use crate::error::StoreError;
use crate::models::Entity;

const MAX_CONCURRENT_DB_OPS: usize = 16;

/// Serialize `entity` with its references resolved.
pub async fn populate<E: Entity>(store: &Store, entity: &E) -> Result<Value, StoreError> {
    let mut doc = serde_json::to_value(entity)?;

    for reference in entity.references() {
        let collection = reference.collection;
        let resolved: Vec<Value> = stream::iter(reference.ids)
            .map(|id| async move {
                let found: Option<Value> = store.find(collection, &Lookup::Id(id.clone())).await?;
                Ok::<_, StoreError>(found.unwrap_or(Value::String(id)))
            })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .try_collect()
            .await?;

        doc[reference.field] = if reference.single {
            resolved.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(resolved)
        };
    }

    Ok(doc)
}

/// Populate every entity of a list, preserving order.
pub async fn populate_all<E: Entity>(store: &Store, entities: &[E]) -> Result<Vec<Value>, StoreError> {
    let mut docs = Vec::with_capacity(entities.len());
    for entity in entities {
        docs.push(populate(store, entity).await?);
    }
    Ok(docs)
}
