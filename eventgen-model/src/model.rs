//! Event type model definitions.
//!
//! This module contains the read-only input of the generator: event type
//! nodes, their property references, and the ordered model that holds them.

use crate::error::ModelError;
use crate::node_id::NodeId;
use std::collections::HashMap;
use std::fmt;

/// Kind of a reference from an event type to another node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Declares a named, typed property.
    HasProperty,
    /// Declares a component (object or variable).
    HasComponent,
    /// Declares a subtype.
    HasSubtype,
    /// Any other reference type, kept verbatim.
    Other(String),
}

impl ReferenceKind {
    /// Parses a reference type name.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "HasProperty" => Self::HasProperty,
            "HasComponent" => Self::HasComponent,
            "HasSubtype" => Self::HasSubtype,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the reference type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::HasProperty => "HasProperty",
            Self::HasComponent => "HasComponent",
            Self::HasSubtype => "HasSubtype",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared data type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataTypeRef {
    /// Reference to a standard-namespace node, written `i=<integer>`.
    Node(u32),
    /// Symbolic scalar type name, kept exactly as written.
    Named(String),
}

impl DataTypeRef {
    /// Classifies a raw data type string.
    ///
    /// Only the exact form `i=<integer>` is a node reference; everything
    /// else, including namespaced ids, stays a raw name.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.strip_prefix("i=")
            .and_then(|n| n.parse().ok())
            .map_or_else(|| Self::Named(s.to_string()), Self::Node)
    }

    /// Returns the referenced node identifier, if any.
    #[must_use]
    pub const fn node(&self) -> Option<u32> {
        match self {
            Self::Node(id) => Some(*id),
            Self::Named(_) => None,
        }
    }
}

impl fmt::Display for DataTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "i={id}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Reference from an event type to one of its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReference {
    /// Reference type.
    pub reference_kind: ReferenceKind,
    /// Browse name of the referenced property.
    pub property_name: String,
    /// Declared data type of the property.
    pub data_type: DataTypeRef,
    /// Node id of the referenced property node.
    pub target_node_id: NodeId,
}

impl PropertyReference {
    /// Creates a `HasProperty` reference.
    #[must_use]
    pub fn property(
        property_name: impl Into<String>,
        data_type: &str,
        target_node_id: NodeId,
    ) -> Self {
        Self {
            reference_kind: ReferenceKind::HasProperty,
            property_name: property_name.into(),
            data_type: DataTypeRef::parse(data_type),
            target_node_id,
        }
    }

    /// Returns true if this is a `HasProperty` reference.
    #[must_use]
    pub fn is_property(&self) -> bool {
        self.reference_kind == ReferenceKind::HasProperty
    }
}

/// One event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    /// Unique node identifier.
    pub node_id: NodeId,
    /// Type name, used as the generated class name.
    pub browse_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Supertype node id, absent only for the root.
    pub parent_node_id: Option<NodeId>,
    /// References in declaration order.
    pub references: Vec<PropertyReference>,
}

impl EventNode {
    /// Creates a new event node without references.
    #[must_use]
    pub fn new(
        node_id: NodeId,
        browse_name: impl Into<String>,
        parent_node_id: Option<NodeId>,
    ) -> Self {
        Self {
            node_id,
            browse_name: browse_name.into(),
            description: None,
            parent_node_id,
            references: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a reference.
    pub fn add_reference(&mut self, reference: PropertyReference) {
        self.references.push(reference);
    }

    /// Returns true if this node has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_node_id.is_none()
    }

    /// Iterates the `HasProperty` references.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyReference> {
        self.references.iter().filter(|r| r.is_property())
    }
}

/// Ordered collection of event types keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct EventModel {
    nodes: Vec<EventNode>,
    index: HashMap<NodeId, usize>,
}

impl EventModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, keeping insertion order.
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateNodeId` if the node id is taken.
    pub fn add_node(&mut self, node: EventNode) -> Result<(), ModelError> {
        if self.index.contains_key(&node.node_id) {
            return Err(ModelError::DuplicateNodeId {
                node_id: node.node_id.to_string(),
            });
        }
        self.index.insert(node.node_id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Builds a model from nodes in iteration order.
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateNodeId` on the first repeated node id.
    pub fn from_nodes(nodes: impl IntoIterator<Item = EventNode>) -> Result<Self, ModelError> {
        let mut model = Self::new();
        for node in nodes {
            model.add_node(node)?;
        }
        Ok(model)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, node_id: &NodeId) -> Option<&EventNode> {
        self.index.get(node_id).map(|&idx| &self.nodes[idx])
    }

    /// Returns the insertion position of a node.
    #[must_use]
    pub fn position(&self, node_id: &NodeId) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    /// Returns true if a node with the given id exists.
    #[must_use]
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.index.contains_key(node_id)
    }

    /// Returns the nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[EventNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the model is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
