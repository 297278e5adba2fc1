//! # eventgen Model
//!
//! Event type information model and hierarchy resolution.
//!
//! This crate provides:
//! - Node, reference and identifier types for event type hierarchies
//! - A NodeSet2 XML loader
//! - Model validation
//! - A resolved, parent-first hierarchy for code generation

pub mod error;
pub mod hierarchy;
pub mod model;
pub mod node_id;
pub mod parser;
pub mod validation;

pub use error::{ModelError, ParseError};
pub use hierarchy::{EventHierarchy, ResolvedEvent};
pub use model::{DataTypeRef, EventModel, EventNode, PropertyReference, ReferenceKind};
pub use node_id::{Identifier, NodeId};
pub use parser::{BASE_EVENT_TYPE, parse_nodeset, parse_nodeset_file};
pub use validation::validate_model;
