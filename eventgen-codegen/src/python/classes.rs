//! Event class code generation.

use crate::error::CodegenError;
use crate::generator::GeneratorConfig;
use crate::python::expr::{
    docstring_text, object_id, render_type_tag, render_value, string_literal,
};
use crate::rules::PropertyMapper;
use crate::writer::CodeWriter;
use eventgen_model::{EventHierarchy, ResolvedEvent};

/// Constructor signature shared by every generated class.
const CONSTRUCTOR: &str = "def __init__(self, sourcenode=None, message=None, severity=1):";

/// Counters collected while emitting classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassStats {
    /// Class definitions written.
    pub classes: usize,
    /// Property initializers written.
    pub properties: usize,
    /// References ignored because they are not `HasProperty`.
    pub skipped_references: usize,
}

/// Generator for event class definitions.
pub struct ClassGenerator<'a> {
    hierarchy: &'a EventHierarchy<'a>,
    mapper: PropertyMapper<'a>,
    config: &'a GeneratorConfig,
}

impl<'a> ClassGenerator<'a> {
    /// Creates a new class generator.
    #[must_use]
    pub fn new(
        hierarchy: &'a EventHierarchy<'a>,
        mapper: PropertyMapper<'a>,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            hierarchy,
            mapper,
            config,
        }
    }

    /// Writes the module docstring, imports and export manifest.
    pub fn generate_preamble(&self, w: &mut CodeWriter) {
        w.emit("\"\"\"");
        w.emit("Autogenerated code from xml spec");
        w.emit("\"\"\"");
        w.blank();
        w.emit(&format!("from {} import ua", self.config.runtime()));
        w.emit(&format!(
            "from {} import {}",
            self.config.base(),
            self.config.base_class_name()
        ));
        w.blank();

        let names: Vec<String> = self
            .hierarchy
            .iter()
            .map(|e| format!("\"{}\"", e.name()))
            .collect();
        w.emit(&format!("__all__ = [{}]", names.join(", ")));
        w.blank();
    }

    /// Writes every class, parents first.
    ///
    /// # Errors
    /// Returns `CodegenError::Property` for the first property that cannot
    /// be mapped.
    pub fn generate(&self, w: &mut CodeWriter) -> Result<ClassStats, CodegenError> {
        let mut stats = ClassStats::default();

        for event in self.hierarchy.iter() {
            let properties = self.generate_class(w, event)?;
            stats.classes += 1;
            stats.properties += properties;
            stats.skipped_references += event.node.references.len() - properties;
        }

        Ok(stats)
    }

    /// Writes one class definition, returning the number of properties.
    fn generate_class(
        &self,
        w: &mut CodeWriter,
        event: &ResolvedEvent<'a>,
    ) -> Result<usize, CodegenError> {
        let name = event.name();
        let base = self.config.base_class_name();
        let parent = self.hierarchy.parent_of(event).map(ResolvedEvent::name);

        w.blank();
        w.emit(&format!("class {}({}):", name, parent.unwrap_or(base)));

        let properties = w.indented(|w| {
            self.generate_docstring(w, event);
            w.emit(CONSTRUCTOR);
            w.indented(|w| {
                match parent {
                    None => w.emit(&format!("{base}.__init__(self)")),
                    Some(_) => {
                        w.emit(&format!(
                            "super({name}, self).__init__(sourcenode, message, severity)"
                        ));
                        w.emit(&format!("self.EventType = {}", object_id(&format!("{name}Type"))));
                    }
                }
                self.generate_properties(w, event)
            })
        })?;

        tracing::debug!(
            "Emitted class {} (parent: {}, {} properties)",
            name,
            parent.unwrap_or(base),
            properties
        );

        Ok(properties)
    }

    /// Writes the class docstring.
    fn generate_docstring(&self, w: &mut CodeWriter, event: &ResolvedEvent<'_>) {
        w.emit("\"\"\"");
        match event.node.description.as_deref() {
            Some(description) => {
                let text = docstring_text(description);
                let mut lines = text.lines();
                let first = lines.next().unwrap_or_default();
                w.emit(&format!("{}: {}", event.name(), first));
                for line in lines {
                    w.emit(line.trim_end());
                }
            }
            None => w.emit(&format!("{}: ", event.name())),
        }
        w.emit("\"\"\"");
    }

    /// Writes one initializer per `HasProperty` reference.
    fn generate_properties(
        &self,
        w: &mut CodeWriter,
        event: &ResolvedEvent<'_>,
    ) -> Result<usize, CodegenError> {
        let mut count = 0;

        for reference in &event.node.references {
            if !reference.is_property() {
                tracing::debug!(
                    "Skipping {} reference from {} to {}",
                    reference.reference_kind,
                    event.name(),
                    reference.target_node_id
                );
                continue;
            }

            let mapping = self
                .mapper
                .map(reference)
                .map_err(|e| CodegenError::property(event.name(), &reference.property_name, e))?;

            if !mapping.type_tag.is_standard() {
                tracing::warn!(
                    "Event {} property {} passes through non-standard variant type '{}'",
                    event.name(),
                    mapping.name,
                    reference.data_type
                );
            }

            w.emit(&format!(
                "self.add_property({}, {}, {})",
                string_literal(&mapping.name),
                render_value(&mapping.value),
                render_type_tag(&mapping.type_tag)
            ));
            count += 1;
        }

        Ok(count)
    }
}
