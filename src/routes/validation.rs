// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request payload validation.
//!
//! Payloads are checked in three stages and every problem is reported as a
//! [`ValidationIssue`]:
//! 1. the body is a JSON object carrying each required property
//! 2. it deserializes into the entity
//! 3. field constraints declared with `validator` hold

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::{OpError, ValidationIssue};
use crate::models::Entity;

/// Parse and validate an entity payload.
pub fn parse_payload<E: Entity>(body: &Bytes) -> Result<E, OpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(OpError::MissingBody(E::KIND));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        OpError::Invalid(vec![ValidationIssue {
            instance_path: String::new(),
            keyword: "type".to_string(),
            params: json!({ "type": "object" }),
            message: format!("must be object ({e})"),
        }])
    })?;

    let Value::Object(object) = &value else {
        return Err(OpError::Invalid(vec![not_an_object()]));
    };

    let missing = missing_properties(object, E::REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(OpError::Invalid(missing));
    }

    let entity: E = serde_json::from_value(value).map_err(type_mismatch)?;

    entity
        .validate()
        .map_err(|errors| OpError::Invalid(constraint_issues(&errors)))?;

    Ok(entity)
}

/// Parse a plain JSON body with no required-field or constraint checks.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes, kind: &'static str) -> Result<T, OpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(OpError::MissingBody(kind));
    }
    serde_json::from_slice(body).map_err(type_mismatch)
}

fn type_mismatch(err: serde_json::Error) -> OpError {
    OpError::Invalid(vec![ValidationIssue {
        instance_path: String::new(),
        keyword: "type".to_string(),
        params: json!({}),
        message: err.to_string(),
    }])
}

fn not_an_object() -> ValidationIssue {
    ValidationIssue {
        instance_path: String::new(),
        keyword: "type".to_string(),
        params: json!({ "type": "object" }),
        message: "must be object".to_string(),
    }
}

fn missing_properties(object: &Map<String, Value>, required: &[&str]) -> Vec<ValidationIssue> {
    required
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| ValidationIssue {
            instance_path: String::new(),
            keyword: "required".to_string(),
            params: json!({ "missingProperty": field }),
            message: format!("must have required property '{field}'"),
        })
        .collect()
}

/// Flatten `validator` errors into issues, one per failed constraint.
pub fn constraint_issues(errors: &ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    collect(errors, "", &mut issues);
    issues.sort_by(|a, b| a.instance_path.cmp(&b.instance_path));
    issues
}

/// JSON property name of a validated struct field.
///
/// `validator` reports Rust field names; clients only know the serde renames.
fn wire_name(field: &str) -> &str {
    match field {
        "name" => "nombre",
        "start" => "inicio",
        "end" => "final",
        "length_km" | "longitude" => "longitud",
        "latitude" => "latitud",
        "elevation_gain" | "elevation" => "desnivel",
        "rating" => "calificacion",
        "stats" => "estadisticas",
        "week" => "semana",
        "month" => "mes",
        "year" => "anio",
        "distance" => "km",
        other => other,
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, issues: &mut Vec<ValidationIssue>) {
    for (field, kind) in errors.errors() {
        let path = format!("{prefix}/{}", wire_name(field));
        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let params: Map<String, Value> = failure
                        .params
                        .iter()
                        .filter(|(name, _)| *name != "value")
                        .map(|(name, v)| (name.to_string(), v.clone()))
                        .collect();
                    let message = match &failure.message {
                        Some(message) => message.to_string(),
                        None => describe(&failure.code, &params),
                    };
                    issues.push(ValidationIssue {
                        instance_path: path.clone(),
                        keyword: failure.code.to_string(),
                        params: Value::Object(params),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, issues),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}/{index}"), issues);
                }
            }
        }
    }
}

fn describe(code: &str, params: &Map<String, Value>) -> String {
    match (code, params.get("min"), params.get("max")) {
        ("range", Some(min), Some(max)) => format!("must be between {min} and {max}"),
        ("range", Some(min), None) => format!("must be >= {min}"),
        ("range", None, Some(max)) => format!("must be <= {max}"),
        ("length", Some(min), _) => format!("must NOT have fewer than {min} characters"),
        _ => format!("failed {code} check"),
    }
}
