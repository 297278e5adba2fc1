//! # eventgen Codegen
//!
//! Generates event class definitions from an event type hierarchy.
//!
//! This crate provides:
//! - Identifier tables mapping numeric ids to standard symbols
//! - Ordered property mapping rules
//! - Python event class and registry generation
//! - An indentation-aware output writer

pub mod error;
pub mod generator;
pub mod python;
pub mod resolver;
pub mod rules;
pub mod writer;

pub use error::{CodegenError, MappingError, ResolverError, UnknownIdentifier};
pub use generator::{GenerationReport, Generator, GeneratorConfig};
pub use resolver::{IdentifierResolver, ObjectIdTable};
pub use rules::{PropertyMapper, PropertyMapping, PropertyValue, TypeTag};
pub use writer::CodeWriter;

use eventgen_model::EventModel;

/// Generates Python event classes from an event model.
///
/// # Arguments
/// * `model` - Event type hierarchy
/// * `resolver` - Lookup from numeric ids to standard symbols
///
/// # Returns
/// Generated Python code as a string.
///
/// # Errors
/// Returns `CodegenError` if the model is invalid or a property cannot be
/// mapped.
pub fn generate(
    model: &EventModel,
    resolver: &dyn IdentifierResolver,
) -> Result<String, CodegenError> {
    Generator::new(model, resolver).generate()
}

/// Generates Python event classes from a NodeSet2 XML string.
///
/// [`ObjectIdTable::standard`] only covers the ids of the base event types;
/// pass a table loaded with [`ObjectIdTable::from_csv`] from the full
/// `NodeIds.csv` listing for complete nodesets.
///
/// # Arguments
/// * `xml` - NodeSet2 XML content
/// * `resolver` - Lookup from numeric ids to standard symbols
///
/// # Returns
/// Generated Python code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    xml: &str,
    resolver: &dyn IdentifierResolver,
) -> Result<String, CodegenError> {
    let model = eventgen_model::parse_nodeset(xml)?;
    generate(&model, resolver)
}

/// Generates Python event classes from a NodeSet2 XML file.
///
/// # Arguments
/// * `path` - Path to the NodeSet2 XML file
/// * `resolver` - Lookup from numeric ids to standard symbols
///
/// # Returns
/// Generated Python code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    resolver: &dyn IdentifierResolver,
) -> Result<String, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, resolver)
}
