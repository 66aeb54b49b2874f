//! Query-string filter parsing.
//!
//! The listing endpoint accepts `filters[<name>]=<value>` for implied
//! equality and `filters[<name>][<op>]=<value>` for explicit operators.
//! This parser only reshapes the flat query pairs into the name → spec
//! mapping the compiler consumes; all semantic rejection (operators, values,
//! key resolution) happens in the compiler.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::errors::{FilterError, FilterResult};

/// Reshape raw query parameters into a filters mapping.
///
/// Parameters outside the `filters` namespace are ignored. A bare `filters`
/// key (no bracket segments) is the array-shape violation the compiler's
/// contract names, so it is rejected here.
pub fn parse_filter_params(params: &HashMap<String, String>) -> FilterResult<Map<String, Value>> {
    let mut filters = Map::new();

    for (raw_key, value) in params {
        if raw_key != "filters" && !raw_key.starts_with("filters[") {
            continue;
        }

        let segments = bracket_segments(raw_key)?;
        match segments.as_slice() {
            [name] => {
                // duplicate names would need two specs for one key
                if filters.contains_key(*name) {
                    return Err(FilterError::InvalidSpec);
                }
                filters.insert((*name).to_string(), Value::String(value.clone()));
            }
            [name, operator] => {
                let spec = filters
                    .entry((*name).to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                match spec {
                    Value::Object(map) => {
                        map.insert((*operator).to_string(), Value::String(value.clone()));
                    }
                    // same name used both as literal and operator form
                    _ => return Err(FilterError::InvalidSpec),
                }
            }
            _ => return Err(FilterError::InvalidFormat),
        }
    }

    Ok(filters)
}

/// Split `filters[a][b]` into its bracket segments.
fn bracket_segments(key: &str) -> FilterResult<Vec<&str>> {
    let rest = key.strip_prefix("filters").ok_or(FilterError::InvalidFormat)?;
    if rest.is_empty() {
        // `filters=foo`: a scalar where a map is required
        return Err(FilterError::InvalidFormat);
    }

    let mut segments = Vec::new();
    let mut remaining = rest;
    while !remaining.is_empty() {
        let inner = remaining
            .strip_prefix('[')
            .and_then(|r| r.split_once(']'))
            .ok_or(FilterError::InvalidFormat)?;
        if inner.0.is_empty() {
            return Err(FilterError::InvalidFormat);
        }
        segments.push(inner.0);
        remaining = inner.1;
    }
    Ok(segments)
}
