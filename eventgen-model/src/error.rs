//! Error types for model loading and validation.

use thiserror::Error;

/// Error type for nodeset parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// A HasProperty reference points at a variable absent from the document.
    #[error("event type '{event}' references missing property node '{target}'")]
    DanglingReference {
        /// Browse name of the referencing event type.
        event: String,
        /// Target node id.
        target: String,
    },

    /// Invalid nodeset structure.
    #[error("invalid nodeset structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// Loaded nodes do not form a valid model.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for structural model violations.
///
/// Every variant is fatal: generation stops before any output is produced.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A node's parent is not present in the model.
    #[error("event type '{node}' has unresolved parent '{parent}'")]
    UnresolvedParent {
        /// Browse name of the orphaned node.
        node: String,
        /// Missing parent node id.
        parent: String,
    },

    /// Two nodes share a browse name.
    #[error("duplicate browse name '{name}' on nodes '{first}' and '{second}'")]
    DuplicateBrowseName {
        /// Shared browse name.
        name: String,
        /// Node id of the first occurrence.
        first: String,
        /// Node id of the second occurrence.
        second: String,
    },

    /// Two nodes share a node id.
    #[error("duplicate node id '{node_id}'")]
    DuplicateNodeId {
        /// Shared node id.
        node_id: String,
    },

    /// No node without a parent.
    #[error("model has no root event type")]
    MissingRoot,

    /// More than one node without a parent.
    #[error("model has multiple root event types: {}", roots.join(", "))]
    MultipleRoots {
        /// Browse names of all parentless nodes.
        roots: Vec<String>,
    },

    /// Parent links form a cycle.
    #[error("circular inheritance detected: {path}")]
    CircularInheritance {
        /// Browse names along the cycle.
        path: String,
    },

    /// Malformed node id text.
    #[error("invalid node id '{value}'")]
    InvalidNodeId {
        /// Offending text.
        value: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}
