// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entity manager: the single point of contact with the document store for
//! one entity kind.
//!
//! Every operation returns an [`OpResult`] envelope instead of raising.
//! Existence checks and writes are separate store calls, so concurrent
//! writers can race between them; only the create path is protected, by
//! the store's create-only insert.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::marker::PhantomData;

use crate::db::{Lookup, Store};
use crate::error::{OpError, StoreError};
use crate::models::Entity;

/// Kind of manager operation, reported in the envelope's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Remove,
    Update,
    Read,
}

/// Uniform result envelope: `{type, success, output?, error?}`.
#[derive(Debug)]
pub struct OpResult<T> {
    kind: OperationKind,
    outcome: Result<T, OpError>,
}

impl<T> OpResult<T> {
    pub fn ok(kind: OperationKind, output: T) -> Self {
        Self {
            kind,
            outcome: Ok(output),
        }
    }

    pub fn fail(kind: OperationKind, error: OpError) -> Self {
        Self {
            kind,
            outcome: Err(error),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&OpError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<T, OpError> {
        self.outcome
    }

    /// Replace a successful output, keeping kind and failure as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OpResult<U> {
        OpResult {
            kind: self.kind,
            outcome: self.outcome.map(f),
        }
    }
}

impl<T: Serialize> Serialize for OpResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OpResult", 3)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("success", &self.is_success())?;
        match &self.outcome {
            Ok(output) => state.serialize_field("output", output)?,
            Err(error) => state.serialize_field("error", error)?,
        }
        state.end()
    }
}

/// What a read returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadQuery {
    All,
    One(Lookup),
}

/// Repository for one entity kind.
pub struct Manager<E> {
    store: Store,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Manager<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Manager<E> {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Whether a document matches `lookup`. Store failures count as absent.
    pub async fn exists(&self, lookup: &Lookup) -> bool {
        match self.store.find::<Value>(E::COLLECTION, lookup).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::warn!(kind = E::KIND, %lookup, error = %e, "Existence check failed");
                false
            }
        }
    }

    /// Insert a new entity under its own id.
    pub async fn create(&self, entity: &E) -> OpResult<String> {
        const OP: OperationKind = OperationKind::Add;
        let id = entity.id().to_string();

        if self.exists(&Lookup::Id(id.clone())).await {
            tracing::warn!(kind = E::KIND, id = %id, "Refusing duplicate create");
            return OpResult::fail(OP, OpError::Duplicate { kind: E::KIND, id });
        }

        match self.store.insert(E::COLLECTION, &id, entity).await {
            Ok(()) => {
                tracing::info!(kind = E::KIND, id = %id, "Created");
                OpResult::ok(OP, format!("The {} with id {} has been added", E::KIND, id))
            }
            Err(StoreError::Conflict(_)) => {
                tracing::warn!(kind = E::KIND, id = %id, "Create lost race to a concurrent insert");
                OpResult::fail(OP, OpError::Duplicate { kind: E::KIND, id })
            }
            Err(e) => {
                tracing::error!(kind = E::KIND, id = %id, error = %e, "Create failed");
                OpResult::fail(OP, e.into())
            }
        }
    }

    /// Read every entity, or the single one matching a lookup.
    pub async fn read(&self, query: &ReadQuery) -> OpResult<Vec<E>> {
        const OP: OperationKind = OperationKind::Read;

        let result = match query {
            ReadQuery::All => self.store.list(E::COLLECTION).await,
            ReadQuery::One(lookup) => {
                tracing::debug!(kind = E::KIND, %lookup, "Reading");
                match self.store.find(E::COLLECTION, lookup).await {
                    Ok(Some(entity)) => Ok(vec![entity]),
                    Ok(None) => {
                        return OpResult::fail(
                            OP,
                            OpError::NotFound {
                                kind: E::KIND,
                                key: lookup.to_string(),
                            },
                        )
                    }
                    Err(e) => Err(e),
                }
            }
        };

        match result {
            Ok(entities) => OpResult::ok(OP, entities),
            Err(e) => {
                tracing::error!(kind = E::KIND, error = %e, "Read failed");
                OpResult::fail(OP, e.into())
            }
        }
    }

    /// Fetch exactly one entity.
    pub async fn get(&self, lookup: &Lookup) -> Result<E, OpError> {
        let mut entities = self
            .read(&ReadQuery::One(lookup.clone()))
            .await
            .into_result()?;
        entities.pop().ok_or_else(|| OpError::NotFound {
            kind: E::KIND,
            key: lookup.to_string(),
        })
    }

    /// Remove the entity matching `lookup`.
    pub async fn delete(&self, lookup: &Lookup) -> OpResult<String> {
        const OP: OperationKind = OperationKind::Remove;
        let not_found = || OpError::NotFound {
            kind: E::KIND,
            key: lookup.to_string(),
        };

        if !self.exists(lookup).await {
            tracing::warn!(kind = E::KIND, %lookup, "Delete target does not exist");
            return OpResult::fail(OP, not_found());
        }

        match self.store.delete(E::COLLECTION, lookup).await {
            Ok(true) => {
                tracing::info!(kind = E::KIND, %lookup, "Deleted");
                OpResult::ok(OP, format!("The {} with {} has been removed", E::KIND, lookup))
            }
            Ok(false) => OpResult::fail(OP, not_found()),
            Err(e) => {
                tracing::error!(kind = E::KIND, %lookup, error = %e, "Delete failed");
                OpResult::fail(OP, e.into())
            }
        }
    }

    /// Replace the entity matching `lookup` with `replacement`.
    ///
    /// Implemented as delete-then-insert. The replacement is stamped with
    /// the id of the document it replaces, so the entity keeps its identity
    /// whichever key was used to find it.
    pub async fn update(&self, lookup: &Lookup, mut replacement: E) -> OpResult<String> {
        const OP: OperationKind = OperationKind::Update;

        let existing = match self.store.find::<Value>(E::COLLECTION, lookup).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                tracing::warn!(kind = E::KIND, %lookup, "Update target does not exist");
                return OpResult::fail(
                    OP,
                    OpError::NotFound {
                        kind: E::KIND,
                        key: lookup.to_string(),
                    },
                );
            }
            Err(e) => return OpResult::fail(OP, e.into()),
        };

        let id = existing
            .get(crate::db::ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or(lookup.value())
            .to_string();
        replacement.set_id(id.clone());

        if let Err(e) = self.store.delete(E::COLLECTION, lookup).await {
            tracing::error!(kind = E::KIND, %lookup, error = %e, "Update failed removing old document");
            return OpResult::fail(OP, e.into());
        }

        match self.store.insert(E::COLLECTION, &id, &replacement).await {
            Ok(()) => {
                tracing::info!(kind = E::KIND, id = %id, %lookup, "Updated");
                OpResult::ok(OP, format!("The {} with {} has been updated", E::KIND, lookup))
            }
            Err(e) => {
                tracing::error!(kind = E::KIND, id = %id, error = %e, "Update failed inserting replacement");
                OpResult::fail(OP, e.into())
            }
        }
    }
}
