//! Rule results and the final validation report.

use serde::{Deserialize, Serialize};

use crate::parse::types::Workflow;

/// Stable defect classification. Repair strategies are looked up by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    MissingTrigger,
    InvalidConnection,
    OrphanedNodes,
    CircularDependency,
    MissingParameters,
    DuplicateName,
    EmptyName,
    PositionCollision,
    UnrecognizedNode,
    TriggerHasIncoming,
    DuplicateEdge,
    MalformedInput,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::MissingTrigger => "missing-trigger",
            Classification::InvalidConnection => "invalid-connection",
            Classification::OrphanedNodes => "orphaned-nodes",
            Classification::CircularDependency => "circular-dependency",
            Classification::MissingParameters => "missing-parameters",
            Classification::DuplicateName => "duplicate-name",
            Classification::EmptyName => "empty-name",
            Classification::PositionCollision => "position-collision",
            Classification::UnrecognizedNode => "unrecognized-node",
            Classification::TriggerHasIncoming => "trigger-has-incoming",
            Classification::DuplicateEdge => "duplicate-edge",
            Classification::MalformedInput => "malformed-input",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Advisory,
}

/// Structured payload of an issue, consumed by the repair strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IssueDetails {
    None,
    #[serde(rename_all = "camelCase")]
    DanglingEdge {
        source: String,
        output: Option<usize>,
        target: Option<String>,
    },
    Orphans { nodes: Vec<String> },
    Cycle { path: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Node { node: String, index: usize, fields: Vec<String> },
    Edge { source: String, target: String },
    Nodes { nodes: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub classification: Classification,
    pub message: String,
    pub details: IssueDetails,
}

impl Issue {
    pub fn new(
        classification: Classification,
        message: impl Into<String>,
        details: IssueDetails,
    ) -> Self {
        Issue {
            classification,
            message: message.into(),
            details,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.classification, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule: &'static str,
    pub passed: bool,
    pub severity: Severity,
    pub classification: Classification,
    pub issues: Vec<Issue>,
}

impl RuleResult {
    pub fn is_critical_failure(&self) -> bool {
        !self.passed && self.severity == Severity::Critical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub iterations: usize,
    pub rules_evaluated: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub is_valid: bool,
    pub issues: Vec<Issue>,
    pub fixes: Vec<String>,
    pub warnings: Vec<String>,
    pub document: Workflow,
    pub metadata: ReportMetadata,
}

impl Report {
    /// A document is only worth writing back when a fix was applied.
    pub fn needs_write_back(&self) -> bool {
        !self.fixes.is_empty()
    }
}
