//! Node classification capability.
//!
//! The graph rules never consult a platform's node vocabulary directly;
//! callers inject one through [`NodeClassifier`].

use std::collections::HashSet;

use crate::parse::types::Node;

pub trait NodeClassifier: Send + Sync {
    /// Whether the caller's domain accepts this node as it stands.
    fn recognizes(&self, node: &Node) -> bool;
}

/// Accepts every node. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl NodeClassifier for AcceptAll {
    fn recognizes(&self, _node: &Node) -> bool {
        true
    }
}

/// A fixed table of accepted node `type` strings. Nodes without a `type`
/// are accepted.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    types: HashSet<String>,
}

impl KnownTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KnownTypes {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl NodeClassifier for KnownTypes {
    fn recognizes(&self, node: &Node) -> bool {
        match &node.node_type {
            Some(t) => self.types.contains(t),
            None => true,
        }
    }
}
