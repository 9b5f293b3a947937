//! Shape of the configuration document: demo presets and match defaults.
//!
//! Every field is optional in the document. Missing values fall back to the
//! built-in defaults so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lock::LockSet;
use crate::matching::{DEFAULT_RATIO, DEFAULT_THRESHOLD, MatchOptions};

/// Complete configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Named list pairs that can be loaded as a starting point.
    pub demos: Vec<DemoPreset>,
    /// Strategy and threshold used when the caller does not override them.
    pub defaults: MatchDefaults,
}

impl AppConfig {
    pub fn demo(&self, index: usize) -> Option<&DemoPreset> {
        self.demos.get(index)
    }

    /// Options built from the configured defaults.
    pub fn match_options(&self) -> MatchOptions {
        self.defaults.match_options()
    }
}

/// Default match options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDefaults {
    pub ratio: String,
    /// `null` in the document disables filtering; a missing key keeps the
    /// built-in threshold.
    pub threshold: Option<f64>,
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO.to_string(),
            threshold: Some(DEFAULT_THRESHOLD),
        }
    }
}

impl MatchDefaults {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            ratio: self.ratio.clone(),
            threshold: self.threshold,
        }
    }
}

/// A preset list pair with optional pre-seeded locks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DemoPreset {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub list_a: Vec<String>,
    pub list_b: Vec<String>,
    /// `[source, target]` pairs.
    pub locks: Vec<(String, String)>,
}

impl DemoPreset {
    /// Validated lock set for this preset.
    pub fn lock_set(&self) -> Result<LockSet> {
        LockSet::try_from_pairs(self.locks.iter().cloned())
    }
}
