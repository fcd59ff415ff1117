use serde::{Deserialize, Serialize};

/// Tension breakpoints for status classification.
///
/// Absolute tension bands are half-open `[from, next)`, so a value sitting on a
/// breakpoint belongs to the higher band. The curve is U-shaped: both slack
/// lines and heavily loaded lines are elevated risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierConfig {
    /// Start of the normal band; below this a line is slack (attention)
    pub normal_from: f64,
    /// Start of the elevated band (attention)
    pub elevated_from: f64,
    /// Start of the high band (critical)
    pub high_from: f64,
    /// Start of the extreme band (critical)
    pub extreme_from: f64,

    /// Percent-of-max thresholds, only used when max tension is unknown
    pub percent_attention: f64,
    pub percent_critical: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            normal_from: 2.0,
            elevated_from: 4.0,
            high_from: 6.0,
            extreme_from: 9.0,
            percent_attention: 50.0,
            percent_critical: 80.0,
        }
    }
}
