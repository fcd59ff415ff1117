use serde_json::{Map, Value};

use super::models::{HookIdentity, HookReading, Rate, TensionSample};

/// Coerce a JSON value to a finite number. Numeric strings are accepted;
/// everything else (null, bools, arrays, objects, junk text) is absent.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First present, non-null field among the accepted spellings.
fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn number_field(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    field(object, keys).and_then(coerce_number)
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(object, keys).and_then(coerce_text)
}

fn identity_of(object: &Map<String, Value>) -> HookIdentity {
    HookIdentity {
        port_name: text_field(object, &["port_name", "portName"]),
        berth_name: text_field(object, &["berth_name", "berthName"]),
        bollard_name: text_field(object, &["bollard_name", "bollardName"]),
        hook_name: text_field(object, &["hook_name", "hookName", "name"]),
    }
}

fn rate_of(object: &Map<String, Value>) -> Option<Rate> {
    let value = field(object, &["rate"])?;
    if let Some(number) = coerce_number(value) {
        return Some(Rate::Value(number));
    }
    coerce_text(value).map(Rate::Label)
}

fn history_of(object: &Map<String, Value>) -> Vec<TensionSample> {
    let Some(Value::Array(entries)) = field(object, &["history"]) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| TensionSample {
            tension: number_field(entry, &["tension"]),
            timestamp: text_field(entry, &["timestamp"]),
        })
        .collect()
}

/// Normalize one raw hook reading. Never fails: malformed fields degrade to
/// absent and a non-object element yields a reading with nothing but defaults.
pub fn normalize_reading(raw: &Value) -> HookReading {
    let Some(object) = raw.as_object() else {
        return HookReading::empty(HookIdentity::default());
    };

    HookReading {
        identity: identity_of(object),
        tension: number_field(object, &["tension"]),
        max_tension: number_field(object, &["max_tension", "maxTension"]),
        percent: number_field(object, &["percent", "tension_percent", "tensionPercent"]),
        faulted: matches!(field(object, &["faulted"]), Some(Value::Bool(true))),
        attached_line: text_field(object, &["attached_line", "attachedLine"]),
        rate: rate_of(object),
        history: history_of(object),
        status_hint: text_field(object, &["status"]),
    }
}
