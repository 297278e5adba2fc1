//! Event registry generation.

use crate::generator::GeneratorConfig;
use crate::python::expr::event_type_id;
use crate::writer::CodeWriter;
use eventgen_model::EventHierarchy;

/// Generator for the type-id to class mapping.
pub struct RegistryGenerator<'a> {
    hierarchy: &'a EventHierarchy<'a>,
    config: &'a GeneratorConfig,
}

impl<'a> RegistryGenerator<'a> {
    /// Creates a new registry generator.
    #[must_use]
    pub fn new(hierarchy: &'a EventHierarchy<'a>, config: &'a GeneratorConfig) -> Self {
        Self { hierarchy, config }
    }

    /// Writes the registry, one entry per event in emission order.
    pub fn generate(&self, w: &mut CodeWriter) {
        w.blank();
        w.blank();
        w.emit(&format!("{} = {{", self.config.registry()));
        w.indented(|w| {
            for event in self.hierarchy.iter() {
                w.emit(&format!("{}: {},", event_type_id(event.name()), event.name()));
            }
        });
        w.emit("}");
    }
}
