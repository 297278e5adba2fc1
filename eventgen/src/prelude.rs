//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use eventgen::prelude::*;
//! ```

// Model types
pub use eventgen_model::{
    BASE_EVENT_TYPE, DataTypeRef, EventHierarchy, EventModel, EventNode, ModelError, NodeId,
    ParseError, PropertyReference, ReferenceKind, parse_nodeset, parse_nodeset_file,
};

// Codegen types
pub use eventgen_codegen::{
    CodegenError, GenerationReport, Generator, GeneratorConfig, IdentifierResolver,
    MappingError, ObjectIdTable, PropertyMapper,
};
