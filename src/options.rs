//! Caller-supplied knobs for a validation run.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairOptions {
    /// Upper bound on repair passes. Zero disables repair.
    pub max_iterations: usize,
    /// Report only; never produce a repaired document.
    pub validate_only: bool,
    /// Stamp `metadata.validatedAt`. Off by default so identical input
    /// yields identical output.
    pub timestamp: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            validate_only: false,
            timestamp: false,
        }
    }
}

impl RepairOptions {
    pub fn validate_only() -> Self {
        RepairOptions {
            validate_only: true,
            ..Default::default()
        }
    }

    pub fn with_max_iterations(max_iterations: usize) -> Self {
        RepairOptions {
            max_iterations,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
