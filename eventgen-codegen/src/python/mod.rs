//! Python code generation modules.

pub mod classes;
pub mod expr;
pub mod registry;

pub use classes::{ClassGenerator, ClassStats};
pub use registry::RegistryGenerator;
