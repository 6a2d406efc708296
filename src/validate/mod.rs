//! Rule engine.
//!
//! A fixed, ordered table of rules. Critical rules come first and block a
//! valid verdict; advisory rules are reported only. Every rule reads the
//! same [`RuleContext`] and shares no mutable state with the others.

pub mod node_rules;
pub mod structural;

use crate::classify::NodeClassifier;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::Workflow;
use crate::report::{Classification, Issue, RuleResult, Severity};

pub struct RuleContext<'a> {
    pub workflow: &'a Workflow,
    pub graph: WorkflowGraph,
    pub classifier: &'a dyn NodeClassifier,
}

impl<'a> RuleContext<'a> {
    pub fn new(workflow: &'a Workflow, classifier: &'a dyn NodeClassifier) -> Self {
        RuleContext {
            workflow,
            graph: WorkflowGraph::build(workflow),
            classifier,
        }
    }
}

pub struct RuleDef {
    pub name: &'static str,
    pub severity: Severity,
    pub classification: Classification,
    pub check: fn(&RuleContext<'_>) -> Vec<Issue>,
}

pub const RULES: &[RuleDef] = &[
    // Critical
    RuleDef {
        name: "trigger-exists",
        severity: Severity::Critical,
        classification: Classification::MissingTrigger,
        check: structural::trigger_exists,
    },
    RuleDef {
        name: "connections-resolve",
        severity: Severity::Critical,
        classification: Classification::InvalidConnection,
        check: structural::connections_resolve,
    },
    RuleDef {
        name: "all-reachable",
        severity: Severity::Critical,
        classification: Classification::OrphanedNodes,
        check: structural::all_reachable,
    },
    RuleDef {
        name: "acyclic",
        severity: Severity::Critical,
        classification: Classification::CircularDependency,
        check: structural::acyclic,
    },
    // Advisory
    RuleDef {
        name: "node-shape",
        severity: Severity::Advisory,
        classification: Classification::MissingParameters,
        check: node_rules::node_shape,
    },
    RuleDef {
        name: "unique-names",
        severity: Severity::Advisory,
        classification: Classification::DuplicateName,
        check: node_rules::unique_names,
    },
    RuleDef {
        name: "non-empty-names",
        severity: Severity::Advisory,
        classification: Classification::EmptyName,
        check: node_rules::non_empty_names,
    },
    RuleDef {
        name: "distinct-positions",
        severity: Severity::Advisory,
        classification: Classification::PositionCollision,
        check: node_rules::distinct_positions,
    },
    RuleDef {
        name: "recognized-nodes",
        severity: Severity::Advisory,
        classification: Classification::UnrecognizedNode,
        check: node_rules::recognized_nodes,
    },
    RuleDef {
        name: "trigger-no-incoming",
        severity: Severity::Advisory,
        classification: Classification::TriggerHasIncoming,
        check: node_rules::trigger_no_incoming,
    },
    RuleDef {
        name: "no-duplicate-edges",
        severity: Severity::Advisory,
        classification: Classification::DuplicateEdge,
        check: node_rules::no_duplicate_edges,
    },
];

/// Run every rule against `workflow`, in table order.
pub fn evaluate(workflow: &Workflow, classifier: &dyn NodeClassifier) -> Vec<RuleResult> {
    let ctx = RuleContext::new(workflow, classifier);

    RULES
        .iter()
        .map(|rule| {
            let issues = (rule.check)(&ctx);
            RuleResult {
                rule: rule.name,
                passed: issues.is_empty(),
                severity: rule.severity,
                classification: rule.classification,
                issues,
            }
        })
        .collect()
}

pub fn has_critical_failure(results: &[RuleResult]) -> bool {
    results.iter().any(RuleResult::is_critical_failure)
}
