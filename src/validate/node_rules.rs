//! Advisory rules. Reported, never blocking.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::visit::EdgeRef;

use super::RuleContext;
use crate::parse::types::NodeCategory;
use crate::report::{Classification, Issue, IssueDetails};

pub fn node_shape(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (index, node) in ctx.workflow.nodes.iter().enumerate() {
        let mut fields = Vec::new();
        if node.parameters.is_none() {
            fields.push("parameters".to_string());
        }
        if node.category.is_none() {
            fields.push("category".to_string());
        }
        if node.position.is_none() {
            fields.push("position".to_string());
        }
        if fields.is_empty() {
            continue;
        }
        issues.push(Issue::new(
            Classification::MissingParameters,
            format!(
                "Node '{}' is missing or has malformed: {}",
                node.name,
                fields.join(", ")
            ),
            IssueDetails::Node {
                node: node.name.clone(),
                index,
                fields,
            },
        ));
    }

    issues
}

/// Only later duplicates are flagged; the first node keeps the name.
pub fn unique_names(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for (index, node) in ctx.workflow.nodes.iter().enumerate() {
        if seen.insert(node.name.as_str()) {
            continue;
        }
        issues.push(Issue::new(
            Classification::DuplicateName,
            format!("Node '{}' (id '{}') repeats an earlier name", node.name, node.id),
            IssueDetails::Node {
                node: node.name.clone(),
                index,
                fields: vec![],
            },
        ));
    }

    issues
}

pub fn non_empty_names(ctx: &RuleContext<'_>) -> Vec<Issue> {
    ctx.workflow
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.name.trim().is_empty())
        .map(|(index, n)| {
            Issue::new(
                Classification::EmptyName,
                format!("Node with id '{}' has an empty name", n.id),
                IssueDetails::Node {
                    node: n.name.clone(),
                    index,
                    fields: vec![],
                },
            )
        })
        .collect()
}

pub fn distinct_positions(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut first_at: HashMap<(u64, u64), String> = HashMap::new();
    let mut issues = Vec::new();

    for node in &ctx.workflow.nodes {
        let Some(position) = node.position else {
            continue;
        };
        match first_at.get(&position.key()) {
            Some(first) => issues.push(Issue::new(
                Classification::PositionCollision,
                format!(
                    "Nodes '{}' and '{}' share position [{}, {}]",
                    first, node.name, position.0, position.1
                ),
                IssueDetails::Nodes {
                    nodes: vec![first.clone(), node.name.clone()],
                },
            )),
            None => {
                first_at.insert(position.key(), node.name.clone());
            }
        }
    }

    issues
}

/// Nodes already neutralized as passthrough are not flagged again.
pub fn recognized_nodes(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (index, node) in ctx.workflow.nodes.iter().enumerate() {
        let message = match &node.category {
            Some(NodeCategory::Passthrough) => continue,
            Some(NodeCategory::Other(category)) => {
                format!("Node '{}' has unrecognized category '{}'", node.name, category)
            }
            _ if !ctx.classifier.recognizes(node) => format!(
                "Node '{}' has unrecognized type '{}'",
                node.name,
                node.node_type.as_deref().unwrap_or("")
            ),
            _ => continue,
        };
        issues.push(Issue::new(
            Classification::UnrecognizedNode,
            message,
            IssueDetails::Node {
                node: node.name.clone(),
                index,
                fields: vec![],
            },
        ));
    }

    issues
}

pub fn trigger_no_incoming(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for idx in ctx.graph.trigger_indices(ctx.workflow) {
        let mut incoming: Vec<_> = ctx
            .graph
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.id(), e.source()))
            .collect();
        incoming.sort_by_key(|(id, _)| *id);

        let target = ctx.workflow.nodes[idx.index()].name.clone();
        for (_, source) in incoming {
            let source = ctx.graph.name(source).to_string();
            issues.push(Issue::new(
                Classification::TriggerHasIncoming,
                format!("Trigger node '{}' has an incoming edge from '{}'", target, source),
                IssueDetails::Edge {
                    source,
                    target: target.clone(),
                },
            ));
        }
    }

    issues
}

pub fn no_duplicate_edges(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (source, conns) in &ctx.workflow.connections {
        for targets in &conns.main {
            let mut seen = HashSet::new();
            for target in targets {
                if !seen.insert((target.node.as_str(), target.index)) {
                    issues.push(Issue::new(
                        Classification::DuplicateEdge,
                        format!("Duplicate edge from '{}' to '{}'", source, target.node),
                        IssueDetails::Edge {
                            source: source.clone(),
                            target: target.node.clone(),
                        },
                    ));
                }
            }
        }
    }

    issues
}
