//! Field validation for submitted reviews.
//!
//! Submissions arrive as loosely typed JSON. Each field is checked on its own
//! so a missing or mistyped field maps to one specific [`ValidationError`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("`{0}` is required and must be a number")]
    NotNumeric(&'static str),

    #[error("`{field}` must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("`{0}` must be a whole number from 1 to 5")]
    InvalidRating(&'static str),

    #[error("`{0}` must be text")]
    NotText(&'static str),

    #[error("`description` must not be empty")]
    EmptyDescription,

    #[error("`timestamp` must be an ISO-8601 instant: {0}")]
    InvalidTimestamp(String),
}

pub(crate) fn object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::NotAnObject)
}

pub(crate) fn coordinate(
    body: &Map<String, Value>,
    field: &'static str,
    limit: f64,
) -> Result<f64, ValidationError> {
    let value = body
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(ValidationError::NotNumeric(field))?;
    check_coordinate(field, value, limit)
}

pub(crate) fn check_coordinate(
    field: &'static str,
    value: f64,
    limit: f64,
) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < -limit || value > limit {
        return Err(ValidationError::OutOfRange {
            field,
            min: -limit,
            max: limit,
        });
    }
    Ok(value)
}

pub(crate) fn rating(body: &Map<String, Value>, field: &'static str) -> Result<u8, ValidationError> {
    let value = body
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(ValidationError::NotNumeric(field))?;

    if value.fract() != 0.0 {
        return Err(ValidationError::InvalidRating(field));
    }
    check_rating(field, value as i64)
}

pub(crate) fn check_rating(field: &'static str, value: i64) -> Result<u8, ValidationError> {
    if value < MIN_RATING as i64 || value > MAX_RATING as i64 {
        return Err(ValidationError::InvalidRating(field));
    }
    Ok(value as u8)
}

pub(crate) fn description(body: &Map<String, Value>) -> Result<String, ValidationError> {
    let text = body
        .get("description")
        .and_then(Value::as_str)
        .ok_or(ValidationError::NotText("description"))?;
    check_description(text)?;
    Ok(text.to_string())
}

pub(crate) fn check_description(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(())
}

/// Absent and `null` both mean "no address".
pub(crate) fn optional_text(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::NotText(field)),
    }
}

pub(crate) fn optional_timestamp(
    body: &Map<String, Value>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match body.get("timestamp") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| ValidationError::InvalidTimestamp(e.to_string())),
        Some(other) => Err(ValidationError::InvalidTimestamp(other.to_string())),
    }
}
