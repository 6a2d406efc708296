//! Rust types mirroring the workflow document JSON.
//!
//! These types are the serde target for both generated and hand-written
//! workflow documents. Fields the validator does not interpret are kept in
//! `extra` so that a document round-trips without losing data.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<Node>,
    pub connections: Connections,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Connections keyed by the source node's display name.
pub type Connections = BTreeMap<String, NodeConnections>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeConnections {
    /// Output ports in order; the port index is the list position.
    #[serde(default)]
    pub main: Vec<Vec<EdgeTarget>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTarget {
    pub node: String,
    #[serde(rename = "type", default = "default_edge_kind")]
    pub kind: String,
    #[serde(default)]
    pub index: u32,
}

fn default_edge_kind() -> String {
    "main".to_string()
}

impl EdgeTarget {
    pub fn main(node: impl Into<String>) -> Self {
        EdgeTarget {
            node: node.into(),
            kind: default_edge_kind(),
            index: 0,
        }
    }
}

// =============================================================================
// NODES
// =============================================================================

/// `category`, `parameters` and `position` are `None` when absent, `null`,
/// or the wrong shape. An unreadable value is kept verbatim in `extra`
/// under its own key, so it still round-trips until repair replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode")]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<NodeCategory>,
    /// Platform node type, opaque to the validator.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Wire shape of a node before the shape-checked fields are read.
#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: Option<Value>,
    #[serde(rename = "type", default)]
    node_type: Option<String>,
    #[serde(default)]
    parameters: Option<Value>,
    #[serde(default)]
    position: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let mut extra = raw.extra;
        Node {
            id: raw.id,
            name: raw.name,
            category: read_field(&mut extra, "category", raw.category),
            node_type: raw.node_type,
            parameters: read_field(&mut extra, "parameters", raw.parameters),
            position: read_field(&mut extra, "position", raw.position),
            extra,
        }
    }
}

fn read_field<T: DeserializeOwned>(
    extra: &mut BTreeMap<String, Value>,
    key: &str,
    value: Option<Value>,
) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(_) => {
            extra.insert(key.to_string(), value);
            None
        }
    }
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: NodeCategory) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            category: Some(category),
            node_type: None,
            parameters: Some(Map::new()),
            position: Some(Position(0.0, 0.0)),
            extra: BTreeMap::new(),
        }
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self.category, Some(NodeCategory::Trigger))
    }
}

/// `[x, y]` canvas coordinates. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub f64, pub f64);

impl Position {
    /// Bit-exact key, used to detect nodes stacked on the same spot.
    pub fn key(&self) -> (u64, u64) {
        (self.0.to_bits(), self.1.to_bits())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeCategory {
    Trigger,
    Action,
    Logic,
    Unknown,
    /// Neutral marker substituted for nodes the caller's domain rejects.
    Passthrough,
    /// A category string outside the known set, kept verbatim.
    Other(String),
}

impl NodeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            NodeCategory::Trigger => "trigger",
            NodeCategory::Action => "action",
            NodeCategory::Logic => "logic",
            NodeCategory::Unknown => "unknown",
            NodeCategory::Passthrough => "passthrough",
            NodeCategory::Other(s) => s,
        }
    }
}

impl From<String> for NodeCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "trigger" => NodeCategory::Trigger,
            "action" => NodeCategory::Action,
            "logic" => NodeCategory::Logic,
            "unknown" => NodeCategory::Unknown,
            "passthrough" => NodeCategory::Passthrough,
            _ => NodeCategory::Other(s),
        }
    }
}

impl From<NodeCategory> for String {
    fn from(c: NodeCategory) -> Self {
        c.as_str().to_string()
    }
}

// =============================================================================
// EDITING HELPERS
// =============================================================================

impl Workflow {
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn has_node_named(&self, name: &str) -> bool {
        self.node_by_name(name).is_some()
    }

    /// Append `target` to `source`'s output port 0.
    pub fn connect(&mut self, source: &str, target: &str) {
        let entry = self.connections.entry(source.to_string()).or_default();
        if entry.main.is_empty() {
            entry.main.push(Vec::new());
        }
        entry.main[0].push(EdgeTarget::main(target));
    }

    /// Iterate every edge as `(source, output port, target)` in key order,
    /// then port order, then target order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, usize, &EdgeTarget)> {
        self.connections.iter().flat_map(|(source, conns)| {
            conns.main.iter().enumerate().flat_map(move |(port, targets)| {
                targets.iter().map(move |t| (source.as_str(), port, t))
            })
        })
    }
}
