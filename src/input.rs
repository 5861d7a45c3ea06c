//! JSON input loading.
//!
//! Report payloads come from an external producer and routinely omit keys or
//! send `null` where a list is expected. The loader itself is strict about
//! syntax, but the models deserialize every field through [`lenient`] so a
//! missing or mistyped value degrades to its default instead of aborting the
//! whole document. List fields go through [`lenient_seq`], which drops only
//! the unusable entries.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ReportError;

/// Reads `path` as UTF-8 JSON and deserializes it into `T`.
pub fn load_json<T>(path: impl AsRef<Path>) -> Result<T, ReportError>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|err| ReportError::Load(format!("{}: {}", path.display(), err)))?;
    parse_json(&raw)
}

/// Deserializes an in-memory JSON document into `T`.
pub fn parse_json<T>(raw: &str) -> Result<T, ReportError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(raw).map_err(|err| ReportError::Load(err.to_string()))
}

/// Field deserializer that falls back to `T::default()` on any shape mismatch.
///
/// Use together with `#[serde(default)]` so absent keys take the same path.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// List deserializer that keeps every usable entry.
///
/// `null` and mistyped entries are skipped; anything other than an array
/// yields an empty list.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = entries.len();
    let kept: Vec<T> = entries
        .into_iter()
        .filter(|entry| !entry.is_null())
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if kept.len() < total {
        warn!("Skipped {} unusable list entries", total - kept.len());
    }
    Ok(kept)
}

/// Map deserializer that keeps every usable entry in input order.
pub fn lenient_map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(IndexMap::new());
    };
    let total = entries.len();
    let kept: IndexMap<String, T> = entries
        .into_iter()
        .filter_map(|(key, entry)| Some((key, serde_json::from_value(entry).ok()?)))
        .collect();
    if kept.len() < total {
        warn!("Skipped {} unusable map entries", total - kept.len());
    }
    Ok(kept)
}

/// Like [`lenient`], but keeps the distinction between "absent or unusable"
/// and a present value.
pub fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Renders a loosely typed JSON value as display text.
///
/// Strings are used verbatim, `null` becomes empty, everything else is shown
/// as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
