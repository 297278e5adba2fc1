//! Top-level event class generator.

use crate::error::CodegenError;
use crate::python::{ClassGenerator, RegistryGenerator};
use crate::resolver::IdentifierResolver;
use crate::rules::PropertyMapper;
use crate::writer::{CodeWriter, DEFAULT_INDENT};
use eventgen_model::{EventHierarchy, EventModel};

/// Settings for the generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    indent: String,
    runtime_module: String,
    base_module: String,
    base_class: String,
    registry_name: String,
    strict_variant_types: bool,
}

impl GeneratorConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            runtime_module: "asyncua".to_string(),
            base_module: ".events".to_string(),
            base_class: "Event".to_string(),
            registry_name: "IMPLEMENTED_EVENTS".to_string(),
            strict_variant_types: false,
        }
    }

    /// Sets the indent unit.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the module the `ua` namespace is imported from.
    #[must_use]
    pub fn runtime_module(mut self, module: impl Into<String>) -> Self {
        self.runtime_module = module.into();
        self
    }

    /// Sets the module the base event class is imported from.
    #[must_use]
    pub fn base_module(mut self, module: impl Into<String>) -> Self {
        self.base_module = module.into();
        self
    }

    /// Sets the base event class name.
    #[must_use]
    pub fn base_class(mut self, class: impl Into<String>) -> Self {
        self.base_class = class.into();
        self
    }

    /// Sets the name of the generated registry.
    #[must_use]
    pub fn registry_name(mut self, name: impl Into<String>) -> Self {
        self.registry_name = name.into();
        self
    }

    /// Rejects variant type tags that are not known variant types.
    #[must_use]
    pub fn strict_variant_types(mut self, strict: bool) -> Self {
        self.strict_variant_types = strict;
        self
    }

    /// Returns the indent unit.
    #[must_use]
    pub fn indent_unit(&self) -> &str {
        &self.indent
    }

    /// Returns the runtime module.
    #[must_use]
    pub fn runtime(&self) -> &str {
        &self.runtime_module
    }

    /// Returns the base event module.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base_module
    }

    /// Returns the base event class name.
    #[must_use]
    pub fn base_class_name(&self) -> &str {
        &self.base_class
    }

    /// Returns the registry name.
    #[must_use]
    pub fn registry(&self) -> &str {
        &self.registry_name
    }

    /// Returns true if unknown variant tags are rejected.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict_variant_types
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Output and counters of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Generated source text.
    pub source: String,
    /// Number of class definitions.
    pub classes: usize,
    /// Number of property initializers.
    pub properties: usize,
    /// Number of non-`HasProperty` references ignored.
    pub skipped_references: usize,
    /// Number of lines written.
    pub lines: usize,
}

/// Generates event class definitions and their registry.
pub struct Generator<'a> {
    model: &'a EventModel,
    resolver: &'a dyn IdentifierResolver,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with default settings.
    #[must_use]
    pub fn new(model: &'a EventModel, resolver: &'a dyn IdentifierResolver) -> Self {
        Self {
            model,
            resolver,
            config: GeneratorConfig::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the module source.
    ///
    /// # Errors
    /// Returns `CodegenError` if the model is not a single rooted tree or a
    /// property cannot be mapped. Nothing is returned on failure.
    pub fn generate(&self) -> Result<String, CodegenError> {
        self.generate_with_report().map(|report| report.source)
    }

    /// Generates the module source and reports counters.
    ///
    /// # Errors
    /// Same as [`Generator::generate`].
    pub fn generate_with_report(&self) -> Result<GenerationReport, CodegenError> {
        let hierarchy = EventHierarchy::from_model(self.model)?;
        tracing::info!("Generating {} event classes", hierarchy.len());

        let mapper =
            PropertyMapper::new(self.resolver).strict_variant_types(self.config.is_strict());
        let classes = ClassGenerator::new(&hierarchy, mapper, &self.config);
        let registry = RegistryGenerator::new(&hierarchy, &self.config);

        let mut writer = CodeWriter::new(self.config.indent_unit());
        classes.generate_preamble(&mut writer);
        let stats = classes.generate(&mut writer)?;
        registry.generate(&mut writer);

        let lines = writer.line_count();
        tracing::info!(
            "Generated {} classes with {} properties ({} lines)",
            stats.classes,
            stats.properties,
            lines
        );

        Ok(GenerationReport {
            source: writer.finish(),
            classes: stats.classes,
            properties: stats.properties,
            skipped_references: stats.skipped_references,
            lines,
        })
    }
}
