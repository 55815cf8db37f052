//! Boundary validation for untrusted request payloads.
//!
//! Requests arrive with loose types (signed integers, free-form strings) and are
//! converted into the engine's typed inputs through `TryFrom`. Every problem is
//! collected per field instead of failing on the first one.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Maximum length accepted for names such as skills, titles and identifiers.
pub const MAX_NAME_LENGTH: usize = 255;

/// Invalid-argument failure carrying a field → reason mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, thiserror::Error)]
#[error("invalid argument: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: BTreeMap<String, String>,
}

fn summarize(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, reason)| format!("{field} {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), reason.into());
        Self { fields }
    }

    pub fn reason_for(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string(), "fields": self.fields });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
    }
}

/// Accumulates field errors while a request is being checked.
#[derive(Debug, Default)]
pub struct Validator {
    fields: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| reason.into());
    }

    /// Checks a signed count and returns it as `u32`, recording an error otherwise.
    pub fn count(&mut self, field: &str, value: i64) -> u32 {
        if value < 0 {
            self.reject(field, "must be greater than or equal to 0");
            return 0;
        }
        match u32::try_from(value) {
            Ok(count) => count,
            Err(_) => {
                self.reject(field, format!("must not exceed {}", u32::MAX));
                0
            }
        }
    }

    /// Non-empty, bounded text such as a skill name.
    pub fn name(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.reject(field, "is required");
        } else if value.chars().count() > MAX_NAME_LENGTH {
            self.reject(field, format!("may not be greater than {MAX_NAME_LENGTH} characters"));
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.fields.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                fields: self.fields,
            })
        }
    }
}
