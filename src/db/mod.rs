// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: a narrow document-store interface with a Firestore
//! backend for deployments and an in-memory backend for local runs and
//! tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::{Config, StoreBackend};
use crate::error::StoreError;
use crate::ids::IdGenerator;

/// Collection names as constants.
pub mod collections {
    pub const ROUTES: &str = "rutas";
    pub const USERS: &str = "users";
    pub const GROUPS: &str = "grupos";
    pub const CHALLENGES: &str = "retos";

    pub const ALL: [&str; 4] = [ROUTES, USERS, GROUPS, CHALLENGES];
}

/// Document field holding the entity id.
pub const ID_FIELD: &str = "id";
/// Document field holding the entity name.
pub const NAME_FIELD: &str = "nombre";

/// How a single document is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(String),
    Name(String),
}

impl Lookup {
    pub fn field(&self) -> &'static str {
        match self {
            Lookup::Id(_) => ID_FIELD,
            Lookup::Name(_) => NAME_FIELD,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Lookup::Id(v) | Lookup::Name(v) => v,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Id(v) => write!(f, "id {v}"),
            Lookup::Name(v) => write!(f, "name {v}"),
        }
    }
}

/// Document store handle. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreDb),
    Memory(MemoryStore),
}

impl Store {
    /// Connect to the backend selected in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        match config.store_backend {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory document store");
                Ok(Self::memory())
            }
            StoreBackend::Firestore => {
                let db = FirestoreDb::new(&config.gcp_project_id).await?;
                Ok(Self {
                    backend: Backend::Firestore(db),
                })
            }
        }
    }

    /// Create an empty in-memory store.
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
        }
    }

    /// Fetch one document, or `None` if nothing matches.
    pub async fn find<T>(&self, collection: &str, lookup: &Lookup) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.find(collection, lookup).await,
            Backend::Memory(mem) => mem.find(collection, lookup),
        }
    }

    /// Fetch every document of a collection.
    pub async fn list<T>(&self, collection: &str) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.list(collection).await,
            Backend::Memory(mem) => mem.list(collection),
        }
    }

    /// Create a document under `id`. Fails with [`StoreError::Conflict`]
    /// if one already exists.
    pub async fn insert<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), StoreError>
    where
        T: Serialize + Send + Sync,
    {
        match &self.backend {
            Backend::Firestore(db) => db.insert(collection, id, doc).await,
            Backend::Memory(mem) => mem.insert(collection, id, doc),
        }
    }

    /// Remove at most one matching document. Returns whether one was removed.
    pub async fn delete(&self, collection: &str, lookup: &Lookup) -> Result<bool, StoreError> {
        match &self.backend {
            Backend::Firestore(db) => db.delete(collection, lookup).await,
            Backend::Memory(mem) => mem.delete(collection, lookup),
        }
    }
}

/// Move the id counter past every `id-N` already stored.
///
/// Returns the counter value after restoration.
pub async fn restore_id_counter(store: &Store, ids: &IdGenerator) -> Result<u64, StoreError> {
    for collection in collections::ALL {
        let docs: Vec<Value> = store.list(collection).await?;
        for doc in &docs {
            if let Some(id) = doc.get(ID_FIELD).and_then(Value::as_str) {
                ids.observe(id);
            }
        }
        tracing::debug!(collection, count = docs.len(), "Scanned collection for ids");
    }
    Ok(ids.counter())
}
