//! Resolved event type hierarchy for code generation.
//!
//! This module turns a validated [`EventModel`] into an explicit tree whose
//! iteration order always visits a parent before any of its subtypes.

use crate::error::ModelError;
use crate::model::{EventModel, EventNode};
use crate::validation::validate_model;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Event type with its resolved position in the tree.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEvent<'a> {
    /// The underlying model node.
    pub node: &'a EventNode,
    /// Index of the parent in the hierarchy, `None` for the root.
    pub parent: Option<usize>,
    /// Distance from the root.
    pub depth: usize,
}

impl ResolvedEvent<'_> {
    /// Returns the generated class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.node.browse_name
    }

    /// Returns true if this is the root event type.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Event types in parent-before-child order.
#[derive(Debug, Clone)]
pub struct EventHierarchy<'a> {
    events: Vec<ResolvedEvent<'a>>,
}

impl<'a> EventHierarchy<'a> {
    /// Validates a model and orders it topologically.
    ///
    /// Among nodes whose parent is already placed, the one that comes first
    /// in the model is placed first, so a model already in parent-first
    /// order keeps its order exactly.
    ///
    /// # Errors
    /// Returns `ModelError` if the model is not a single rooted tree.
    pub fn from_model(model: &'a EventModel) -> Result<Self, ModelError> {
        validate_model(model)?;

        let nodes = model.nodes();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut ready = BinaryHeap::new();

        for (idx, node) in nodes.iter().enumerate() {
            match node.parent_node_id.as_ref().and_then(|p| model.position(p)) {
                Some(parent) => children[parent].push(idx),
                None => ready.push(Reverse(idx)),
            }
        }

        // slot[model index] = position in `events`
        let mut slot: Vec<Option<usize>> = vec![None; nodes.len()];
        let mut events: Vec<ResolvedEvent<'a>> = Vec::with_capacity(nodes.len());

        while let Some(Reverse(idx)) = ready.pop() {
            let node = &nodes[idx];
            let parent = node
                .parent_node_id
                .as_ref()
                .and_then(|p| model.position(p))
                .and_then(|p| slot[p]);
            let depth = parent.map_or(0, |p| events[p].depth + 1);

            slot[idx] = Some(events.len());
            events.push(ResolvedEvent {
                node,
                parent,
                depth,
            });

            ready.extend(children[idx].iter().map(|&c| Reverse(c)));
        }

        if events.len() != nodes.len() {
            let start = slot
                .iter()
                .position(Option::is_none)
                .unwrap_or_default();
            return Err(ModelError::CircularInheritance {
                path: cycle_path(model, start),
            });
        }

        Ok(Self { events })
    }

    /// Returns the events in emission order.
    #[must_use]
    pub fn events(&self) -> &[ResolvedEvent<'a>] {
        &self.events
    }

    /// Iterates the events in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedEvent<'a>> {
        self.events.iter()
    }

    /// Returns the root event.
    #[must_use]
    pub fn root(&self) -> Option<&ResolvedEvent<'a>> {
        self.events.first()
    }

    /// Returns the parent of an event.
    #[must_use]
    pub fn parent_of(&self, event: &ResolvedEvent<'a>) -> Option<&ResolvedEvent<'a>> {
        event.parent.map(|p| &self.events[p])
    }

    /// Returns the direct subtypes of the event at `index`.
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &ResolvedEvent<'a>> {
        self.events
            .iter()
            .filter(move |e| e.parent == Some(index))
    }

    /// Returns the supertypes of an event, nearest first.
    pub fn ancestors(&self, event: &ResolvedEvent<'a>) -> impl Iterator<Item = &ResolvedEvent<'a>> {
        std::iter::successors(self.parent_of(event), |e| self.parent_of(e))
    }

    /// Looks up an event by browse name.
    #[must_use]
    pub fn find(&self, browse_name: &str) -> Option<&ResolvedEvent<'a>> {
        self.events.iter().find(|e| e.name() == browse_name)
    }

    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if there are no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Follows parent links from an unplaced node until a name repeats.
fn cycle_path(model: &EventModel, start: usize) -> String {
    let nodes = model.nodes();
    let mut path: Vec<usize> = Vec::new();
    let mut current = Some(start);

    while let Some(idx) = current {
        if let Some(pos) = path.iter().position(|&p| p == idx) {
            let mut names: Vec<&str> = path[pos..]
                .iter()
                .map(|&i| nodes[i].browse_name.as_str())
                .collect();
            names.push(&nodes[idx].browse_name);
            return names.join(" -> ");
        }
        path.push(idx);
        current = nodes[idx]
            .parent_node_id
            .as_ref()
            .and_then(|p| model.position(p));
    }

    path.iter()
        .map(|&i| nodes[i].browse_name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_id::NodeId;

    fn node(id: u32, name: &str, parent: Option<u32>) -> EventNode {
        EventNode::new(NodeId::numeric(id), name, parent.map(NodeId::numeric))
    }

    fn names(hierarchy: &EventHierarchy<'_>) -> Vec<String> {
        hierarchy.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_preserves_parent_first_order() {
        let model = EventModel::from_nodes([
            node(2041, "BaseEvent", None),
            node(2052, "AuditEvent", Some(2041)),
            node(2130, "SystemEvent", Some(2041)),
            node(2058, "AuditSecurityEvent", Some(2052)),
        ])
        .expect("model");

        let hierarchy = EventHierarchy::from_model(&model).expect("hierarchy");
        assert_eq!(
            names(&hierarchy),
            ["BaseEvent", "AuditEvent", "SystemEvent", "AuditSecurityEvent"]
        );
    }

    #[test]
    fn test_reorders_children_before_parents() {
        let model = EventModel::from_nodes([
            node(2059, "AuditChannelEvent", Some(2058)),
            node(2058, "AuditSecurityEvent", Some(2052)),
            node(2052, "AuditEvent", Some(2041)),
            node(2041, "BaseEvent", None),
        ])
        .expect("model");

        let hierarchy = EventHierarchy::from_model(&model).expect("hierarchy");
        assert_eq!(
            names(&hierarchy),
            ["BaseEvent", "AuditEvent", "AuditSecurityEvent", "AuditChannelEvent"]
        );

        let leaf = hierarchy.find("AuditChannelEvent").expect("leaf");
        assert_eq!(leaf.depth, 3);
        let ancestors: Vec<_> = hierarchy.ancestors(leaf).map(|e| e.name()).collect();
        assert_eq!(ancestors, ["AuditSecurityEvent", "AuditEvent", "BaseEvent"]);
    }

    #[test]
    fn test_parent_links_and_children() {
        let model = EventModel::from_nodes([
            node(2041, "BaseEvent", None),
            node(2052, "AuditEvent", Some(2041)),
            node(2130, "SystemEvent", Some(2041)),
        ])
        .expect("model");

        let hierarchy = EventHierarchy::from_model(&model).expect("hierarchy");
        let root = hierarchy.root().expect("root");
        assert!(root.is_root());
        assert_eq!(root.name(), "BaseEvent");

        let audit = hierarchy.find("AuditEvent").expect("audit");
        assert_eq!(hierarchy.parent_of(audit).map(|e| e.name()), Some("BaseEvent"));

        let children: Vec<_> = hierarchy.children_of(0).map(|e| e.name()).collect();
        assert_eq!(children, ["AuditEvent", "SystemEvent"]);
    }

    #[test]
    fn test_detects_cycle() {
        let model = EventModel::from_nodes([
            node(2041, "BaseEvent", None),
            node(1, "Ping", Some(2)),
            node(2, "Pong", Some(1)),
        ])
        .expect("model");

        match EventHierarchy::from_model(&model) {
            Err(ModelError::CircularInheritance { path }) => {
                assert_eq!(path, "Ping -> Pong -> Ping");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validation_runs_first() {
        let model = EventModel::from_nodes([
            node(2041, "BaseEvent", None),
            node(2052, "AuditEvent", Some(4242)),
        ])
        .expect("model");

        assert!(matches!(
            EventHierarchy::from_model(&model),
            Err(ModelError::UnresolvedParent { .. })
        ));
    }
}
