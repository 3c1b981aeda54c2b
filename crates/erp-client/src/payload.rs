//! Shape-tolerant helpers for the ERP's JSON envelopes.
//!
//! The upstream API wraps everything at least once (`retorno`), wraps
//! collections under plural/singular key pairs, and renames identifier
//! fields between versions. These helpers treat every unknown shape as
//! "absent", never as an error.

use serde_json::Value;

/// Containers a summary may nest its record under.
const NESTED_CONTAINERS: &[&str] = &["pedido", "nota", "conta"];

/// Peels the `retorno` envelope when present.
pub fn unwrap_root(response: &Value) -> &Value {
    response.get("retorno").unwrap_or(response)
}

/// Unwraps a search collection into its entries.
///
/// Accepts either `{plural: [{singular: {..}}, ..]}`, a bare array of
/// records, or the doubly-nested `{plural: {plural: [..]}}` variant some
/// endpoint versions produce. Anything else yields an empty list.
pub fn unwrap_collection(root: &Value, plural: &str, singular: &str) -> Vec<Value> {
    let Some(collection) = root.get(plural) else {
        return Vec::new();
    };

    if let Some(entries) = collection.as_array() {
        return entries
            .iter()
            .map(|entry| entry.get(singular).unwrap_or(entry).clone())
            .collect();
    }

    if let Some(entries) = collection.get(plural).and_then(Value::as_array) {
        return entries
            .iter()
            .map(|entry| entry.get(singular).unwrap_or(entry).clone())
            .collect();
    }

    Vec::new()
}

/// Probes a summary for a usable detail identifier.
///
/// Each candidate key is tried as-is, in snake_case, upper-case and
/// lower-case, then inside the known nested containers, before giving up.
pub fn resolve_detail_id(summary: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let spellings = [
            (*key).to_string(),
            camel_to_snake(key),
            key.to_uppercase(),
            key.to_lowercase(),
        ];
        for spelling in &spellings {
            if let Some(id) = summary.get(spelling).and_then(scalar_string) {
                return Some(id);
            }
        }
        for container in NESTED_CONTAINERS {
            if let Some(id) = summary
                .get(container)
                .and_then(|nested| nested.get(key))
                .and_then(scalar_string)
            {
                return Some(id);
            }
        }
    }
    None
}

/// Renders a scalar JSON value as a non-empty string.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn camel_to_snake(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
