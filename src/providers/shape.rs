//! Turning raw secret payloads into the shapes callers ask for.

use super::StringMap;
use crate::errors::{ResolveError, Result};
use serde_json::Value;

/// Decode a payload as text, byte for byte
pub fn decode_text(payload: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(payload)?)
}

/// Parse a payload as a YAML (or JSON) mapping
///
/// An empty or whitespace-only payload is an empty mapping. Any other document
/// whose root is not a mapping with string keys is rejected.
pub fn parse_string_map(payload: &[u8]) -> Result<StringMap> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(StringMap::new());
    }

    serde_yaml::from_slice(payload).map_err(ResolveError::MalformedPayload)
}

/// Walk a `/`-separated key path into a structured secret
///
/// Leading and trailing separators are ignored; an empty key path yields the
/// whole mapping.
pub fn project(map: &StringMap, key_path: &str) -> Result<Value> {
    let mut segments = key_path.split('/').filter(|segment| !segment.is_empty());

    let Some(first) = segments.next() else {
        return Ok(Value::Object(map.clone()));
    };

    let not_found = || ResolveError::FragmentNotFound { path: key_path.to_string() };

    let mut current = map.get(first).ok_or_else(not_found)?;
    for segment in segments {
        current = current.as_object().and_then(|object| object.get(segment)).ok_or_else(not_found)?;
    }

    Ok(current.clone())
}
