//! Model validation utilities.
//!
//! This module checks the structural invariants the generator relies on:
//! unique browse names, a single root, and resolvable parents.

use crate::error::ModelError;
use crate::model::EventModel;

/// Validates a model for generation.
///
/// # Arguments
/// * `model` - The model to validate
///
/// # Returns
/// Ok(()) if valid, or ModelError describing the first violation.
///
/// # Errors
/// Returns `ModelError` if validation fails.
pub fn validate_model(model: &EventModel) -> Result<(), ModelError> {
    validate_browse_names(model)?;
    validate_root(model)?;
    validate_parents(model)?;
    Ok(())
}

/// Ensures every browse name is used once.
fn validate_browse_names(model: &EventModel) -> Result<(), ModelError> {
    use std::collections::HashMap;

    let mut seen = HashMap::new();

    for node in model.nodes() {
        if let Some(first) = seen.insert(node.browse_name.as_str(), &node.node_id) {
            return Err(ModelError::DuplicateBrowseName {
                name: node.browse_name.clone(),
                first: first.to_string(),
                second: node.node_id.to_string(),
            });
        }
    }

    Ok(())
}

/// Ensures exactly one node has no parent.
fn validate_root(model: &EventModel) -> Result<(), ModelError> {
    let roots: Vec<_> = model
        .nodes()
        .iter()
        .filter(|n| n.is_root())
        .map(|n| n.browse_name.clone())
        .collect();

    match roots.len() {
        0 => Err(ModelError::MissingRoot),
        1 => Ok(()),
        _ => Err(ModelError::MultipleRoots { roots }),
    }
}

/// Ensures every parent id resolves within the model.
fn validate_parents(model: &EventModel) -> Result<(), ModelError> {
    for node in model.nodes() {
        if let Some(parent) = &node.parent_node_id
            && !model.contains(parent)
        {
            return Err(ModelError::UnresolvedParent {
                node: node.browse_name.clone(),
                parent: parent.to_string(),
            });
        }
    }

    Ok(())
}
