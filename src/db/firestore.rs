// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore backend.
//!
//! Each entity is stored as one document whose document id is the entity
//! id. Name lookups are filtered queries on the `nombre` field.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::db::{Lookup, ID_FIELD};
use crate::error::StoreError;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Fetch one document by id (direct read) or by name (filtered query).
    pub async fn find<T>(&self, collection: &str, lookup: &Lookup) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        match lookup {
            Lookup::Id(id) => self
                .client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj()
                .one(id)
                .await
                .map_err(|e| StoreError::Database(e.to_string())),
            Lookup::Name(_) => {
                let field = lookup.field();
                let value = lookup.value().to_string();
                let mut docs: Vec<T> = self
                    .client
                    .fluent()
                    .select()
                    .from(collection)
                    .filter(move |q| q.field(field).eq(value.clone()))
                    .limit(1)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                Ok(docs.pop())
            }
        }
    }

    /// Fetch every document in a collection.
    pub async fn list<T>(&self, collection: &str) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Create-only write; Firestore rejects an existing document id.
    pub async fn insert<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), StoreError>
    where
        T: Serialize + Send + Sync,
    {
        // `.object` reads the created document back, so it needs an owned type
        let value = serde_json::to_value(doc)?;
        let result: Result<Value, firestore::errors::FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(&value)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => Err(
                StoreError::Conflict(format!("{collection}/{id}")),
            ),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    /// Delete the first document matching `lookup`.
    pub async fn delete(&self, collection: &str, lookup: &Lookup) -> Result<bool, StoreError> {
        let existing: Option<Value> = self.find(collection, lookup).await?;
        let Some(doc) = existing else {
            return Ok(false);
        };

        let doc_id = match lookup {
            Lookup::Id(id) => id.clone(),
            Lookup::Name(_) => doc
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    StoreError::Database(format!("Document in {collection} has no id field"))
                })?,
        };

        self.client
            .fluent()
            .delete()
            .from(collection)
            .document_id(&doc_id)
            .execute()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(collection, doc_id = %doc_id, "Deleted document");
        Ok(true)
    }
}
