//! Repair strategy registry.
//!
//! One pure function per classification. A strategy takes the current
//! document and the failed [`RuleResult`] and returns a new document plus
//! human-readable fix notes. An empty note list means nothing was changed.
//! Strategies add nodes and edges or remove edges; none removes a node.

pub mod connections;
pub mod nodes;
pub mod orphans;
pub mod trigger;

use std::collections::HashSet;

use crate::parse::types::Workflow;
use crate::report::{Classification, RuleResult};

#[derive(Debug, Clone)]
pub struct Repair {
    pub workflow: Workflow,
    pub fixes: Vec<String>,
}

impl Repair {
    pub fn noop(workflow: &Workflow) -> Self {
        Repair {
            workflow: workflow.clone(),
            fixes: vec![],
        }
    }

    pub fn is_noop(&self) -> bool {
        self.fixes.is_empty()
    }
}

pub type Strategy = fn(&Workflow, &RuleResult) -> Repair;

/// Look up the strategy for a classification. Report-only advisories have
/// none.
pub fn strategy_for(classification: Classification) -> Option<Strategy> {
    match classification {
        Classification::MissingTrigger => Some(trigger::add_trigger),
        Classification::InvalidConnection => Some(connections::remove_dangling),
        Classification::OrphanedNodes => Some(orphans::connect_orphans),
        Classification::CircularDependency => Some(connections::break_cycle),
        Classification::MissingParameters => Some(nodes::fill_defaults),
        Classification::DuplicateName => Some(nodes::rename_duplicates),
        Classification::UnrecognizedNode => Some(nodes::mark_passthrough),
        Classification::TriggerHasIncoming => Some(connections::drop_trigger_inputs),
        Classification::EmptyName
        | Classification::PositionCollision
        | Classification::DuplicateEdge
        | Classification::MalformedInput => None,
    }
}

/// Every name the document mentions: node names, connection sources and
/// edge targets. A generated name must avoid all of them so it cannot
/// accidentally resolve a dangling reference.
fn taken_names(workflow: &Workflow) -> HashSet<String> {
    let mut taken: HashSet<String> = workflow.nodes.iter().map(|n| n.name.clone()).collect();
    for (source, _, target) in workflow.edges() {
        taken.insert(source.to_string());
        taken.insert(target.node.clone());
    }
    taken.extend(workflow.connections.keys().cloned());
    taken
}

/// `base` when free, otherwise `"<base> <k>"` for the smallest free `k >= 2`.
pub(crate) fn unique_name(workflow: &Workflow, base: &str) -> String {
    let taken = taken_names(workflow);
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|k| format!("{} {}", base, k))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
