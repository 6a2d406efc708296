//! Unified error type for inputs that cannot enter the repair loop.

use thiserror::Error;

use crate::report::Classification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Structure,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Structure => write!(f, "Structure"),
        }
    }
}

/// A structural input error. Graph-level defects are never reported this
/// way; they end up in the report's issues instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{phase}:{code}] {message}")]
pub struct ValidatorError {
    pub code: &'static str,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
}

impl ValidatorError {
    pub fn parse(code: &'static str, message: impl Into<String>) -> Self {
        ValidatorError {
            code,
            phase: Phase::Parse,
            message: message.into(),
            node_id: None,
        }
    }

    pub fn structure(
        code: &'static str,
        message: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        ValidatorError {
            code,
            phase: Phase::Structure,
            message: message.into(),
            node_id,
        }
    }

    /// Every structural error is a malformed-input failure.
    pub fn classification(&self) -> Classification {
        Classification::MalformedInput
    }
}
