//! Python rendering of property values and type tags.

use crate::rules::{PropertyValue, TypeTag};

/// Renders a typed identifier expression for a standard symbol.
#[must_use]
pub fn object_id(symbol: &str) -> String {
    format!("ua.NodeId(ua.ObjectIds.{symbol})")
}

/// Renders the typed identifier of an event type by its class name.
#[must_use]
pub fn event_type_id(class_name: &str) -> String {
    format!("ua.ObjectIds.{class_name}Type")
}

/// Renders an initializer value.
#[must_use]
pub fn render_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::SourceNode => "sourcenode".to_string(),
        PropertyValue::Severity => "severity".to_string(),
        PropertyValue::False => "False".to_string(),
        PropertyValue::LocalizedMessage => "ua.LocalizedText(message)".to_string(),
        PropertyValue::ObjectId(symbol) => object_id(symbol),
        PropertyValue::Null => "None".to_string(),
    }
}

/// Renders a type tag.
#[must_use]
pub fn render_type_tag(tag: &TypeTag) -> String {
    match tag {
        TypeTag::DateTime => "ua.VariantType.DateTime".to_string(),
        TypeTag::ObjectId(symbol) => object_id(symbol),
        TypeTag::Variant(name) => format!("ua.VariantType.{name}"),
    }
}

/// Renders text as a single-quoted string literal.
#[must_use]
pub fn string_literal(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Escapes text for a triple-quoted docstring.
#[must_use]
pub fn docstring_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}
