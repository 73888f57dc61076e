// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema-less access to YAML documents.
//!
//! Documents are decoded into a [`serde_yaml::Value`] tree and navigated by key
//! paths. Getters return `Ok(None)` when a key is absent and
//! [`DeployerError::UnexpectedShape`] when a value along the path has the wrong
//! type. Mapping order is preserved, so re-encoding a document that was
//! produced by this codec yields the same text.

use crate::error::{DeployerError, Result};
use serde_yaml::{Mapping, Number, Sequence, Value};

/// Decode a YAML document. Blank input decodes to `Value::Null`.
pub fn decode(data: &[u8]) -> Result<Value> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_yaml::from_slice(data)?)
}

pub fn encode(node: &Value) -> Result<Vec<u8>> {
    Ok(serde_yaml::to_string(node)?.into_bytes())
}

pub fn join_path(path: &[&str]) -> String {
    if path.is_empty() {
        ".".to_string()
    } else {
        path.join(".")
    }
}

fn unexpected(path: &[&str], expected: &'static str) -> DeployerError {
    DeployerError::UnexpectedShape {
        path: join_path(path),
        expected,
    }
}

pub fn nested_field<'a>(node: &'a Value, path: &[&str]) -> Result<Option<&'a Value>> {
    let mut current = node;
    for (idx, key) in path.iter().enumerate() {
        let Value::Mapping(map) = current else {
            return Err(unexpected(&path[..idx], "mapping"));
        };
        match map.get(*key) {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

pub fn nested_field_mut<'a>(node: &'a mut Value, path: &[&str]) -> Result<Option<&'a mut Value>> {
    let mut current = node;
    for (idx, key) in path.iter().enumerate() {
        let Value::Mapping(map) = current else {
            return Err(unexpected(&path[..idx], "mapping"));
        };
        match map.get_mut(*key) {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

pub fn nested_str<'a>(node: &'a Value, path: &[&str]) -> Result<Option<&'a str>> {
    match nested_field(node, path)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(unexpected(path, "string")),
    }
}

pub fn nested_map<'a>(node: &'a Value, path: &[&str]) -> Result<Option<&'a Mapping>> {
    match nested_field(node, path)? {
        None => Ok(None),
        Some(Value::Mapping(map)) => Ok(Some(map)),
        Some(_) => Err(unexpected(path, "mapping")),
    }
}

pub fn nested_seq<'a>(node: &'a Value, path: &[&str]) -> Result<Option<&'a Sequence>> {
    match nested_field(node, path)? {
        None => Ok(None),
        Some(Value::Sequence(seq)) => Ok(Some(seq)),
        Some(_) => Err(unexpected(path, "sequence")),
    }
}

/// Read an integer field. Floating point values are truncated toward zero,
/// since numbers that went through a JSON round-trip may come back as floats.
pub fn nested_i64(node: &Value, path: &[&str]) -> Result<Option<i64>> {
    match nested_field(node, path)? {
        None => Ok(None),
        Some(Value::Number(n)) => number_to_i64(n)
            .map(Some)
            .ok_or_else(|| unexpected(path, "integer")),
        Some(_) => Err(unexpected(path, "number")),
    }
}

fn number_to_i64(n: &Number) -> Option<i64> {
    if let Some(value) = n.as_i64() {
        return Some(value);
    }
    if n.is_u64() {
        return None;
    }
    n.as_f64()
        .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f.trunc() as i64)
}

/// Set a field, creating intermediate mappings as needed. An existing key
/// keeps its position in the mapping.
pub fn set_nested_field(node: &mut Value, value: Value, path: &[&str]) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *node = value;
        return Ok(());
    };

    let mut current = node;
    for (idx, key) in parents.iter().enumerate() {
        let Value::Mapping(map) = current else {
            return Err(unexpected(&path[..idx], "mapping"));
        };
        current = map
            .entry(Value::from(*key))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    let Value::Mapping(map) = current else {
        return Err(unexpected(parents, "mapping"));
    };
    map.insert(Value::from(*last), value);
    Ok(())
}

/// Remove a field, keeping the order of its siblings. Returns the removed value.
pub fn remove_nested_field(node: &mut Value, path: &[&str]) -> Result<Option<Value>> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(None);
    };
    match nested_field_mut(node, parents)? {
        None => Ok(None),
        Some(Value::Mapping(map)) => Ok(map.shift_remove(*last)),
        Some(_) => Err(unexpected(parents, "mapping")),
    }
}
