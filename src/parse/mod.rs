//! Parse phase: JSON → Rust types + structural checks + graph view.

pub mod graph;
pub mod types;

use std::collections::HashSet;

use serde_json::Value;

pub use graph::WorkflowGraph;
pub use types::*;

use crate::error::ValidatorError;

/// Deserialize a workflow JSON string into a `Workflow` and run the
/// structural checks. Anything rejected here never reaches the repair loop.
pub fn parse(json: &str) -> Result<Workflow, ValidatorError> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        ValidatorError::parse("P001", format!("Failed to parse workflow JSON: {}", e))
    })?;
    parse_value(value)
}

pub fn parse_value(value: Value) -> Result<Workflow, ValidatorError> {
    let Some(obj) = value.as_object() else {
        return Err(ValidatorError::parse("P002", "Workflow must be a JSON object"));
    };
    if !obj.get("nodes").is_some_and(Value::is_array) {
        return Err(ValidatorError::parse("P002", "Workflow is missing the 'nodes' array"));
    }
    if !obj.get("connections").is_some_and(Value::is_object) {
        return Err(ValidatorError::parse(
            "P002",
            "Workflow is missing the 'connections' object",
        ));
    }

    let workflow = serde_json::from_value::<Workflow>(value).map_err(|e| {
        ValidatorError::parse("P001", format!("Failed to read workflow document: {}", e))
    })?;
    check_structure(&workflow)?;
    Ok(workflow)
}

/// Reject documents whose node identities cannot be told apart.
pub fn check_structure(workflow: &Workflow) -> Result<(), ValidatorError> {
    let mut seen = HashSet::new();
    for node in &workflow.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(ValidatorError::structure(
                "P003",
                format!("Duplicate node id '{}'", node.id),
                Some(node.id.clone()),
            ));
        }
    }
    Ok(())
}
