//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
///
/// Every variant aborts the run; no partial output is returned.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Nodeset parsing error.
    #[error("nodeset parse error: {0}")]
    Parse(#[from] eventgen_model::ParseError),

    /// Structural model error.
    #[error("model error: {0}")]
    Model(#[from] eventgen_model::ModelError),

    /// Identifier table error.
    #[error("identifier table error: {0}")]
    Resolver(#[from] ResolverError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A property reference could not be mapped.
    #[error("event '{event}' property '{property}': {source}")]
    Property {
        /// Browse name of the event type.
        event: String,
        /// Browse name of the property.
        property: String,
        /// Mapping failure.
        #[source]
        source: MappingError,
    },
}

impl CodegenError {
    /// Creates a property mapping error with its event context.
    pub fn property(
        event: impl Into<String>,
        property: impl Into<String>,
        source: MappingError,
    ) -> Self {
        Self::Property {
            event: event.into(),
            property: property.into(),
            source,
        }
    }
}

/// Error type for the property mapping rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The identifier table has no symbol for an id.
    #[error("{rule} rule: no symbol registered for identifier {id}")]
    UnknownIdentifier {
        /// Unresolved numeric id.
        id: u32,
        /// Name of the rule that needed it.
        rule: &'static str,
    },

    /// The target node id has no standard-namespace integer part.
    #[error("{rule} rule: target '{target}' is not a standard numeric node id")]
    UnresolvableTarget {
        /// Target node id text.
        target: String,
        /// Name of the rule that needed it.
        rule: &'static str,
    },

    /// Strict mode rejected a data type that is not a variant type.
    #[error("data type '{data_type}' is not a variant type")]
    InvalidVariantType {
        /// Raw data type string.
        data_type: String,
    },
}

/// No symbol registered for a numeric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no symbol registered for identifier {0}")]
pub struct UnknownIdentifier(pub u32);

/// Error type for identifier table loading.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// A listing line is not `Name,Id[,NodeClass]`.
    #[error("invalid identifier listing at line {line}: '{content}'")]
    InvalidCsvLine {
        /// One-based line number.
        line: usize,
        /// Offending line.
        content: String,
    },
}
