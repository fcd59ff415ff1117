//! Hook reading data model.
//!
//! A reading is one hook's telemetry as delivered by a single poll. Readings are
//! produced by the normalizer and are never mutated afterwards.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The port/berth/bollard/hook name tuple that identifies one physical hook.
///
/// Absent names stay `None`, so a hook with no berth and a hook on a berth
/// literally named "unknown" never share a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookIdentity {
    pub port_name: Option<String>,
    pub berth_name: Option<String>,
    pub bollard_name: Option<String>,
    pub hook_name: Option<String>,
}

impl HookIdentity {
    pub fn new(port: &str, berth: &str, bollard: &str, hook: &str) -> Self {
        Self {
            port_name: Some(port.to_string()),
            berth_name: Some(berth.to_string()),
            bollard_name: Some(bollard.to_string()),
            hook_name: Some(hook.to_string()),
        }
    }

    /// Fill absent names from an enclosing scope (nested port documents).
    pub fn inherit(mut self, parent: &HookIdentity) -> Self {
        if self.port_name.is_none() {
            self.port_name = parent.port_name.clone();
        }
        if self.berth_name.is_none() {
            self.berth_name = parent.berth_name.clone();
        }
        if self.bollard_name.is_none() {
            self.bollard_name = parent.bollard_name.clone();
        }
        if self.hook_name.is_none() {
            self.hook_name = parent.hook_name.clone();
        }
        self
    }
}

impl fmt::Display for HookIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |name: &Option<String>| name.clone().unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{}/{}/{}/{}",
            part(&self.port_name),
            part(&self.berth_name),
            part(&self.bollard_name),
            part(&self.hook_name)
        )
    }
}

/// Producer-reported rate of change: either a number or a free-form label
/// such as "rising".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rate {
    Value(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionSample {
    pub tension: Option<f64>,
    pub timestamp: Option<String>, // as sent by the producer
}

impl TensionSample {
    /// Parse the sample timestamp. Producers send either RFC 3339 or a naive
    /// ISO 8601 value; naive values are taken as UTC.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// One hook's normalized telemetry for a single poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookReading {
    #[serde(flatten)]
    pub identity: HookIdentity,
    pub tension: Option<f64>,
    pub max_tension: Option<f64>,
    pub percent: Option<f64>,
    pub faulted: bool,
    pub attached_line: Option<String>,
    pub rate: Option<Rate>,
    pub history: Vec<TensionSample>,
    /// Server-computed status label, only consulted when no numeric data exists.
    #[serde(rename = "status")]
    pub status_hint: Option<String>,
}

impl HookReading {
    pub fn empty(identity: HookIdentity) -> Self {
        Self {
            identity,
            tension: None,
            max_tension: None,
            percent: None,
            faulted: false,
            attached_line: None,
            rate: None,
            history: Vec::new(),
            status_hint: None,
        }
    }

    /// Percent of rated maximum for display: the reported value, else derived
    /// from tension and max tension.
    pub fn effective_percent(&self) -> Option<f64> {
        if self.percent.is_some() {
            return self.percent;
        }
        match (self.tension, self.max_tension) {
            (Some(tension), Some(max)) if max > 0.0 => Some(tension / max * 100.0),
            _ => None,
        }
    }

    /// Numeric rate of change: the reported value, else the delta between the
    /// last two numeric history samples, else zero.
    pub fn rate_of_change(&self) -> f64 {
        if let Some(Rate::Value(value)) = self.rate {
            return value;
        }

        let mut numeric = self.history.iter().rev().filter_map(|sample| sample.tension);
        match (numeric.next(), numeric.next()) {
            (Some(latest), Some(previous)) => latest - previous,
            _ => 0.0,
        }
    }

    /// Newest parseable history timestamp.
    pub fn last_sample_at(&self) -> Option<DateTime<Utc>> {
        self.history.iter().filter_map(TensionSample::recorded_at).max()
    }
}
