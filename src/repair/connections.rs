//! Edge-removal strategies: dangling references, cycles, edges into
//! triggers.

use std::collections::HashSet;

use tracing::trace;

use super::Repair;
use crate::parse::types::{EdgeTarget, Workflow};
use crate::report::{IssueDetails, RuleResult};

/// `invalid-connection`: drop the dangling entries and nothing else.
pub fn remove_dangling(workflow: &Workflow, result: &RuleResult) -> Repair {
    let mut next = workflow.clone();
    let mut fixes = Vec::new();

    for issue in &result.issues {
        let IssueDetails::DanglingEdge {
            source,
            output,
            target,
        } = &issue.details
        else {
            continue;
        };

        match target {
            None => {
                if next.has_node_named(source) {
                    continue;
                }
                if next.connections.remove(source).is_some() {
                    fixes.push(format!("Removed connections from unknown node '{}'", source));
                }
            }
            Some(target) => {
                if next.has_node_named(target) {
                    continue;
                }
                let removed =
                    remove_edges(&mut next, source, *output, usize::MAX, |t| t.node == *target);
                if removed > 0 {
                    fixes.push(format!(
                        "Removed dangling connection '{}' -> '{}'",
                        source, target
                    ));
                }
            }
        }
    }

    trace!(fixes = fixes.len(), "removed dangling references");
    Repair {
        workflow: next,
        fixes,
    }
}

/// `circular-dependency`: remove the single edge that closes the reported
/// path, from its second-to-last to its last node.
pub fn break_cycle(workflow: &Workflow, result: &RuleResult) -> Repair {
    let path = result.issues.iter().find_map(|issue| match &issue.details {
        IssueDetails::Cycle { path } if path.len() >= 2 => Some(path),
        _ => None,
    });
    let Some(path) = path else {
        return Repair::noop(workflow);
    };

    let source = &path[path.len() - 2];
    let target = &path[path.len() - 1];
    let mut next = workflow.clone();
    if remove_edges(&mut next, source, None, 1, |t| t.node == *target) == 0 {
        return Repair::noop(workflow);
    }

    Repair {
        workflow: next,
        fixes: vec![format!(
            "Removed connection '{}' -> '{}' to break cycle {}",
            source,
            target,
            path.join(" -> ")
        )],
    }
}

/// `trigger-has-incoming`: triggers start execution and take no input.
pub fn drop_trigger_inputs(workflow: &Workflow, result: &RuleResult) -> Repair {
    let mut next = workflow.clone();
    let mut fixes = Vec::new();
    let mut done = HashSet::new();

    for issue in &result.issues {
        let IssueDetails::Edge { source, target } = &issue.details else {
            continue;
        };
        if !done.insert((source.as_str(), target.as_str())) {
            continue;
        }
        if !next.node_by_name(target).is_some_and(|n| n.is_trigger()) {
            continue;
        }
        if remove_edges(&mut next, source, None, usize::MAX, |t| t.node == *target) > 0 {
            fixes.push(format!(
                "Removed connection '{}' -> '{}' into trigger node",
                source, target
            ));
        }
    }

    Repair {
        workflow: next,
        fixes,
    }
}

/// Remove up to `limit` targets of `source` matching `matches`, scanning
/// `port` only, or every port in order when `port` is `None`. Trailing
/// ports emptied by the removal are dropped, and so is the source entry
/// when no port is left. Returns the number of targets removed.
pub(crate) fn remove_edges(
    workflow: &mut Workflow,
    source: &str,
    port: Option<usize>,
    limit: usize,
    matches: impl Fn(&EdgeTarget) -> bool,
) -> usize {
    let Some(conns) = workflow.connections.get_mut(source) else {
        return 0;
    };

    let mut removed = 0;
    let mut emptied = HashSet::new();
    for (i, targets) in conns.main.iter_mut().enumerate() {
        if port.is_some_and(|p| p != i) {
            continue;
        }
        let before = targets.len();
        targets.retain(|t| {
            if removed < limit && matches(t) {
                removed += 1;
                false
            } else {
                true
            }
        });
        if before > 0 && targets.is_empty() {
            emptied.insert(i);
        }
        if removed >= limit {
            break;
        }
    }

    while conns.main.last().is_some_and(|t| t.is_empty())
        && emptied.contains(&(conns.main.len() - 1))
    {
        conns.main.pop();
    }
    if conns.main.is_empty() && !emptied.is_empty() {
        workflow.connections.remove(source);
    }

    removed
}
