//! petgraph-based directed graph view over a workflow document.
//!
//! Graph node `i` is `workflow.nodes[i]`, so index order is declaration
//! order. Edges are added in connection order and handed back in that
//! order, which keeps every traversal deterministic.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};

use super::types::Workflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub output: usize,
    pub input: u32,
}

/// A connection entry that names a node absent from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub source: String,
    /// `None` when the source itself is unknown; every edge under it dangles.
    pub output: Option<usize>,
    pub target: Option<String>,
}

pub struct WorkflowGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    /// Display name to the first node declaring it.
    pub node_indices: HashMap<String, NodeIndex>,
    pub dangling: Vec<DanglingRef>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

impl WorkflowGraph {
    /// Build the graph. Never fails: unresolved references are collected in
    /// `dangling` for the referential-integrity rule to report.
    pub fn build(workflow: &Workflow) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut dangling = Vec::new();

        for node in &workflow.nodes {
            let idx = graph.add_node(node.name.clone());
            node_indices.entry(node.name.clone()).or_insert(idx);
        }

        for (source, conns) in &workflow.connections {
            let Some(&s) = node_indices.get(source) else {
                dangling.push(DanglingRef {
                    source: source.clone(),
                    output: None,
                    target: None,
                });
                continue;
            };
            for (output, targets) in conns.main.iter().enumerate() {
                for target in targets {
                    match node_indices.get(&target.node) {
                        Some(&t) => {
                            graph.add_edge(
                                s,
                                t,
                                EdgeLabel {
                                    output,
                                    input: target.index,
                                },
                            );
                        }
                        None => dangling.push(DanglingRef {
                            source: source.clone(),
                            output: Some(output),
                            target: Some(target.node.clone()),
                        }),
                    }
                }
            }
        }

        WorkflowGraph {
            graph,
            node_indices,
            dangling,
        }
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    pub fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Successors in edge insertion order, duplicates included.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, t)| t).collect()
    }

    pub fn incoming_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    pub fn outgoing_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Every node reachable from any of `starts`, the starts included.
    pub fn reachable_from(
        &self,
        starts: impl IntoIterator<Item = NodeIndex>,
    ) -> HashSet<NodeIndex> {
        let mut reachable = HashSet::new();
        for start in starts {
            if reachable.contains(&start) {
                continue;
            }
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(nx) = bfs.next(&self.graph) {
                reachable.insert(nx);
            }
        }
        reachable
    }

    pub fn trigger_indices(&self, workflow: &Workflow) -> Vec<NodeIndex> {
        workflow
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_trigger())
            .map(|(i, _)| NodeIndex::new(i))
            .collect()
    }

    pub fn reachable_from_triggers(&self, workflow: &Workflow) -> HashSet<NodeIndex> {
        self.reachable_from(self.trigger_indices(workflow))
    }

    /// Three-colour depth-first search. Roots are tried in declaration order
    /// and successors in insertion order; the first cycle found is returned
    /// as `[entry, ..., entry]`.
    pub fn find_cycle(&self) -> Option<Vec<NodeIndex>> {
        let mut color = vec![Color::White; self.graph.node_count()];

        for root in self.graph.node_indices() {
            if color[root.index()] != Color::White {
                continue;
            }
            color[root.index()] = Color::Gray;
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
                vec![(root, self.successors(root), 0)];

            while let Some(frame) = stack.last_mut() {
                if frame.2 >= frame.1.len() {
                    color[frame.0.index()] = Color::Black;
                    stack.pop();
                    continue;
                }
                let next = frame.1[frame.2];
                frame.2 += 1;

                match color[next.index()] {
                    Color::White => {
                        color[next.index()] = Color::Gray;
                        stack.push((next, self.successors(next), 0));
                    }
                    Color::Gray => {
                        let Some(start) = stack.iter().position(|(n, _, _)| *n == next) else {
                            continue;
                        };
                        let mut path: Vec<NodeIndex> =
                            stack[start..].iter().map(|(n, _, _)| *n).collect();
                        path.push(next);
                        return Some(path);
                    }
                    Color::Black => {}
                }
            }
        }

        None
    }
}
