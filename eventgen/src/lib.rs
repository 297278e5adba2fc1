//! # eventgen
//!
//! Event class generator for OPC UA event type hierarchies.
//!
//! eventgen reads the event types of an information model and emits one
//! class per event type, parents first, followed by a registry mapping each
//! event type identifier to its class.
//!
//! ## Quick Start
//!
//! ```ignore
//! use eventgen::prelude::*;
//!
//! let model = parse_nodeset(&std::fs::read_to_string("Opc.Ua.NodeSet2.xml")?)?;
//! let table = ObjectIdTable::standard();
//! let source = Generator::new(&model, &table)
//!     .with_config(GeneratorConfig::new().strict_variant_types(true))
//!     .generate()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Event node model, NodeSet2 loader and hierarchy resolution
//! - [`codegen`] - Identifier tables, property rules and code generation

pub mod prelude;

/// Event node model, NodeSet2 loader and hierarchy resolution.
pub mod model {
    pub use eventgen_model::*;
}

/// Identifier tables, property rules and code generation.
pub mod codegen {
    pub use eventgen_codegen::*;
}

pub use eventgen_codegen::{generate, generate_from_file, generate_from_xml};
