use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookStatus {
    Normal,
    Attention,
    Critical,
    Unknown,
}

impl HookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookStatus::Normal => "normal",
            HookStatus::Attention => "attention",
            HookStatus::Critical => "critical",
            HookStatus::Unknown => "unknown",
        }
    }

    /// Attention and critical are alert states; normal and unknown are calm.
    pub fn is_alert(&self) -> bool {
        matches!(self, HookStatus::Attention | HookStatus::Critical)
    }

    /// Ordering used to pick a group's display color.
    pub fn severity(&self) -> u8 {
        match self {
            HookStatus::Normal => 0,
            HookStatus::Unknown => 1,
            HookStatus::Attention => 2,
            HookStatus::Critical => 3,
        }
    }

    /// Map a server-supplied status label. Only the three definite labels are
    /// recognised; anything else is `None`.
    pub fn from_hint(hint: &str) -> Option<HookStatus> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(HookStatus::Critical),
            "attention" => Some(HookStatus::Attention),
            "normal" => Some(HookStatus::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for HookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_are_case_insensitive() {
        assert_eq!(HookStatus::from_hint(" CRITICAL "), Some(HookStatus::Critical));
        assert_eq!(HookStatus::from_hint("Attention"), Some(HookStatus::Attention));
        assert_eq!(HookStatus::from_hint("normal"), Some(HookStatus::Normal));
        assert_eq!(HookStatus::from_hint("unknown"), None);
        assert_eq!(HookStatus::from_hint("offline"), None);
    }

    #[test]
    fn alert_partition() {
        assert!(HookStatus::Attention.is_alert());
        assert!(HookStatus::Critical.is_alert());
        assert!(!HookStatus::Normal.is_alert());
        assert!(!HookStatus::Unknown.is_alert());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&HookStatus::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
