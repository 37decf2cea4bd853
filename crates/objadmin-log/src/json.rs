//! JSON projection of event records.
//!
//! Field names and omission rules come from the `serde` attributes on the
//! record types; these helpers only wrap `serde_json` errors in
//! [`LogError`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::LogError;

/// Serializes a record to a compact single-line JSON document.
///
/// # Errors
///
/// Returns `LogError::Serialization` if `serde_json` rejects the value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, LogError> {
    Ok(serde_json::to_string(value)?)
}

/// Serializes a record to a `serde_json::Value` tree.
///
/// # Errors
///
/// Returns `LogError::Serialization` if `serde_json` rejects the value.
pub fn to_json_value<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, LogError> {
    Ok(serde_json::to_value(value)?)
}

/// Parses a record from a JSON document. Missing fields take their zero value.
///
/// # Errors
///
/// Returns `LogError::Serialization` on malformed JSON, type mismatches, or
/// unparseable timestamps.
pub fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T, LogError> {
    Ok(serde_json::from_str(raw)?)
}
