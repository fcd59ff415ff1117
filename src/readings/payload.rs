//! Decoding of the polled telemetry document.
//!
//! Two shapes are accepted:
//! - flat: `{ "hooks": [ {port_name, berth_name, bollard_name, hook_name, ...}, ... ] }`
//! - nested, as written by the data generator:
//!   `{ "name": port, "berths": [ { "name", "bollards": [ { "name", "hooks": [...] } ] } ] }`
//!
//! A document with neither key carries no hooks.

use serde_json::Value;
use thiserror::Error;

use super::models::{HookIdentity, HookReading};
use super::normalize::normalize_reading;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload is {0}, expected a JSON object")]
    NotAnObject(&'static str),
    #[error("`hooks` is {0}, expected an array")]
    HooksNotArray(&'static str),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn decode_payload(document: &Value) -> Result<Vec<HookReading>, PayloadError> {
    let Some(object) = document.as_object() else {
        return Err(PayloadError::NotAnObject(kind(document)));
    };

    match object.get("hooks") {
        Some(Value::Array(items)) => Ok(items.iter().map(normalize_reading).collect()),
        Some(Value::Null) => Ok(Vec::new()),
        Some(other) => Err(PayloadError::HooksNotArray(kind(other))),
        None => Ok(flatten_port(document)),
    }
}

/// Flatten a nested port document into readings, each hook inheriting the
/// names of its enclosing port, berth and bollard.
fn flatten_port(port: &Value) -> Vec<HookReading> {
    let port_scope = HookIdentity {
        port_name: name_of(port),
        ..HookIdentity::default()
    };

    let mut readings = Vec::new();
    for berth in children(port, "berths") {
        let berth_scope = HookIdentity {
            berth_name: name_of(berth),
            ..port_scope.clone()
        };
        for bollard in children(berth, "bollards") {
            let bollard_scope = HookIdentity {
                bollard_name: name_of(bollard),
                ..berth_scope.clone()
            };
            for hook in children(bollard, "hooks") {
                let mut reading = normalize_reading(hook);
                reading.identity = reading.identity.inherit(&bollard_scope);
                readings.push(reading);
            }
        }
    }
    readings
}

fn children<'a>(parent: &'a Value, key: &str) -> &'a [Value] {
    match parent.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

fn name_of(value: &Value) -> Option<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
