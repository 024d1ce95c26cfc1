//! Tokenizer feature flags.
//!
//! This module contains the `FeaturesConfig` struct which selects the
//! optional markdown constructs the tokenizer scans for.

use serde::{Deserialize, Serialize};

/// Feature flags configuration.
///
/// Controls which optional constructs are detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeaturesConfig {
    /// Detect `[text](url)` links.
    /// Default: true
    #[serde(default = "default_true")]
    pub links: bool,

    /// Detect `==text==` highlighted spans.
    /// Default: true
    #[serde(default = "default_true")]
    pub highlights: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            links: true,
            highlights: true,
        }
    }
}

impl FeaturesConfig {
    /// Merge another FeaturesConfig into this one.
    ///
    /// All fields are copied from `other`; an override file parsed with
    /// serde defaults carries every field.
    pub fn merge(&mut self, other: &FeaturesConfig) {
        self.links = other.links;
        self.highlights = other.highlights;
    }

    /// Create a new FeaturesConfig with every optional construct disabled.
    pub fn all_disabled() -> Self {
        Self {
            links: false,
            highlights: false,
        }
    }
}

fn default_true() -> bool {
    true
}
