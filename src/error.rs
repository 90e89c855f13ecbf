// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types.
//!
//! [`StoreError`] is what the document store returns. [`OpError`] is the
//! failure carried inside a manager result envelope; it is never raised to
//! the HTTP layer, only inspected and forwarded.

use axum::http::StatusCode;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Document store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Document already exists: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One payload validation problem, shaped like a JSON-schema validator error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub instance_path: String,
    pub keyword: String,
    pub params: Value,
    pub message: String,
}

/// Failure reported inside a result envelope.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("The {kind} with id {id} already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("The {key} does not match any {kind}")]
    NotFound { kind: &'static str, key: String },

    #[error("A name or an id must be provided")]
    MissingKey,

    #[error("The {0} data must be provided")]
    MissingBody(&'static str),

    #[error("The payload failed validation")]
    Invalid(Vec<ValidationIssue>),

    #[error("Store error: {0}")]
    Store(String),
}

impl OpError {
    /// HTTP status used when this failure reaches a handler.
    pub fn status(&self) -> StatusCode {
        match self {
            OpError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<StoreError> for OpError {
    fn from(err: StoreError) -> Self {
        OpError::Store(err.to_string())
    }
}

impl Serialize for OpError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OpError::Invalid(issues) => issues.serialize(serializer),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            OpError::Store("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(OpError::MissingKey.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            OpError::NotFound {
                kind: "group",
                key: "id x".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_serializes_as_message() {
        let err = OpError::NotFound {
            kind: "group",
            key: "id id-99".into(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!("The id id-99 does not match any group")
        );
    }

    #[test]
    fn test_invalid_serializes_issue_list() {
        let err = OpError::Invalid(vec![ValidationIssue {
            instance_path: String::new(),
            keyword: "required".into(),
            params: json!({ "missingProperty": "nombre" }),
            message: "must have required property 'nombre'".into(),
        }]);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value[0]["instancePath"], "");
        assert_eq!(value[0]["params"]["missingProperty"], "nombre");
    }

    #[test]
    fn test_store_error_converts() {
        let err: OpError = StoreError::Database("unavailable".into()).into();
        assert_eq!(err.to_string(), "Store error: Database error: unavailable");
    }
}
