//! Property mapping rules.
//!
//! Each `HasProperty` reference becomes an initializer value and a type tag.
//! Both halves are chosen by walking an ordered rule table and taking the
//! first rule whose predicate holds. The two tables are evaluated
//! independently of each other, so a property may take its value from one
//! kind of rule and its tag from another.
//!
//! The output is language neutral; backends render [`PropertyValue`] and
//! [`TypeTag`] into source text.

use crate::error::MappingError;
use crate::resolver::IdentifierResolver;
use eventgen_model::{DataTypeRef, PropertyReference};

/// Initializer value of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// The constructor's source node parameter.
    SourceNode,
    /// The constructor's severity parameter.
    Severity,
    /// Literal false.
    False,
    /// The constructor's message parameter wrapped as localized text.
    LocalizedMessage,
    /// Typed identifier of a standard node, by symbol.
    ObjectId(String),
    /// Absent value.
    Null,
}

/// Declared storage kind of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// Date/time variant.
    DateTime,
    /// Typed identifier of the data type node, by symbol.
    ObjectId(String),
    /// Variant type named by the raw data type string.
    Variant(String),
}

impl TypeTag {
    /// Returns false for a variant tag whose name is not a known variant type.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        match self {
            Self::Variant(name) => is_variant_type(name),
            Self::DateTime | Self::ObjectId(_) => true,
        }
    }
}

/// Result of mapping one property reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    /// Property browse name.
    pub name: String,
    /// Initializer value.
    pub value: PropertyValue,
    /// Type tag.
    pub type_tag: TypeTag,
    /// Name of the value rule that fired.
    pub value_rule: &'static str,
    /// Name of the type rule that fired.
    pub type_rule: &'static str,
}

/// Inputs shared by every rule action.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// Identifier lookup.
    pub resolver: &'a dyn IdentifierResolver,
    /// Reject variant tags that are not known variant types.
    pub strict_variant_types: bool,
}

/// Named predicate/action pair.
pub struct Rule<T> {
    /// Rule name, reported in errors and logs.
    pub name: &'static str,
    /// Whether the rule applies.
    pub applies: fn(&PropertyReference) -> bool,
    /// Computes the result.
    pub apply: fn(&PropertyReference, &RuleContext<'_>) -> Result<T, MappingError>,
}

/// Rule producing an initializer value.
pub type ValueRule = Rule<PropertyValue>;

/// Rule producing a type tag.
pub type TypeRule = Rule<TypeTag>;

/// Conditional rules in priority order, backed by a rule that always applies.
pub struct RuleTable<T: 'static> {
    /// Conditional rules; the first whose predicate holds is used.
    pub rules: &'static [Rule<T>],
    /// Rule used when no conditional rule applies.
    pub fallback: Rule<T>,
}

impl<T: 'static> RuleTable<T> {
    /// Returns the rule that applies to a reference.
    #[must_use]
    pub fn select(&self, reference: &PropertyReference) -> &Rule<T> {
        self.rules
            .iter()
            .find(|rule| (rule.applies)(reference))
            .unwrap_or(&self.fallback)
    }

    /// Applies the selected rule, returning its name and result.
    ///
    /// # Errors
    /// Returns `MappingError` if the selected rule fails.
    pub fn apply(
        &self,
        reference: &PropertyReference,
        ctx: &RuleContext<'_>,
    ) -> Result<(&'static str, T), MappingError> {
        let rule = self.select(reference);
        (rule.apply)(reference, ctx).map(|out| (rule.name, out))
    }
}

/// Value rules in priority order.
pub static VALUE_RULES: RuleTable<PropertyValue> = RuleTable {
    rules: &[
        Rule {
            name: "source-node",
            applies: |r| r.property_name == "SourceNode",
            apply: |_, _| Ok(PropertyValue::SourceNode),
        },
        Rule {
            name: "severity",
            applies: |r| r.property_name == "Severity",
            apply: |_, _| Ok(PropertyValue::Severity),
        },
        Rule {
            name: "status",
            applies: |r| r.property_name == "Status",
            apply: |_, _| Ok(PropertyValue::False),
        },
        Rule {
            name: "message",
            applies: |r| r.property_name == "Message",
            apply: |_, _| Ok(PropertyValue::LocalizedMessage),
        },
        Rule {
            name: "node-reference",
            applies: |r| r.data_type.node().is_some(),
            apply: target_object_id,
        },
    ],
    fallback: Rule {
        name: "null",
        applies: |_| true,
        apply: |_, _| Ok(PropertyValue::Null),
    },
};

/// Type rules in priority order.
pub static TYPE_RULES: RuleTable<TypeTag> = RuleTable {
    rules: &[
        Rule {
            name: "time",
            applies: |r| r.property_name.ends_with("Time"),
            apply: |_, _| Ok(TypeTag::DateTime),
        },
        Rule {
            name: "node-reference",
            applies: |r| r.data_type.node().is_some(),
            apply: data_type_object_id,
        },
    ],
    fallback: Rule {
        name: "variant",
        applies: |_| true,
        apply: variant_tag,
    },
};

/// Variant type names accepted in strict mode.
pub const VARIANT_TYPES: &[&str] = &[
    "Null",
    "Boolean",
    "SByte",
    "Byte",
    "Int16",
    "UInt16",
    "Int32",
    "UInt32",
    "Int64",
    "UInt64",
    "Float",
    "Double",
    "String",
    "DateTime",
    "Guid",
    "ByteString",
    "XmlElement",
    "NodeId",
    "ExpandedNodeId",
    "StatusCode",
    "QualifiedName",
    "LocalizedText",
    "ExtensionObject",
    "DataValue",
    "Variant",
    "DiagnosticInfo",
];

/// Returns true if `name` is a known variant type.
#[must_use]
pub fn is_variant_type(name: &str) -> bool {
    VARIANT_TYPES.contains(&name)
}

/// Returns the symbol's leading segment before its first underscore.
///
/// `BaseEventType_SourceNode` becomes `BaseEventType`; a symbol without an
/// underscore is returned unchanged.
#[must_use]
pub fn type_segment(symbol: &str) -> &str {
    symbol.split_once('_').map_or(symbol, |(head, _)| head)
}

/// Resolves an id to the leading segment of its symbol.
fn object_id(ctx: &RuleContext<'_>, id: u32, rule: &'static str) -> Result<String, MappingError> {
    ctx.resolver
        .resolve(id)
        .map(|symbol| type_segment(symbol).to_string())
        .map_err(|e| MappingError::UnknownIdentifier { id: e.0, rule })
}

fn target_object_id(
    r: &PropertyReference,
    ctx: &RuleContext<'_>,
) -> Result<PropertyValue, MappingError> {
    let id = r
        .target_node_id
        .standard_numeric()
        .ok_or_else(|| MappingError::UnresolvableTarget {
            target: r.target_node_id.to_string(),
            rule: "node-reference",
        })?;
    object_id(ctx, id, "node-reference").map(PropertyValue::ObjectId)
}

/// Selected only for `DataTypeRef::Node`; a named type is handed to the
/// variant rule so the action is total.
fn data_type_object_id(
    r: &PropertyReference,
    ctx: &RuleContext<'_>,
) -> Result<TypeTag, MappingError> {
    match r.data_type {
        DataTypeRef::Node(id) => object_id(ctx, id, "node-reference").map(TypeTag::ObjectId),
        DataTypeRef::Named(_) => variant_tag(r, ctx),
    }
}

fn variant_tag(r: &PropertyReference, ctx: &RuleContext<'_>) -> Result<TypeTag, MappingError> {
    let raw = r.data_type.to_string();
    if ctx.strict_variant_types && !is_variant_type(&raw) {
        return Err(MappingError::InvalidVariantType { data_type: raw });
    }
    Ok(TypeTag::Variant(raw))
}

/// Maps property references through the rule tables.
#[derive(Clone, Copy)]
pub struct PropertyMapper<'a> {
    ctx: RuleContext<'a>,
}

impl<'a> PropertyMapper<'a> {
    /// Creates a mapper that passes unknown variant tags through.
    #[must_use]
    pub fn new(resolver: &'a dyn IdentifierResolver) -> Self {
        Self {
            ctx: RuleContext {
                resolver,
                strict_variant_types: false,
            },
        }
    }

    /// Sets whether unknown variant tags are rejected.
    #[must_use]
    pub fn strict_variant_types(mut self, strict: bool) -> Self {
        self.ctx.strict_variant_types = strict;
        self
    }

    /// Maps a property reference.
    ///
    /// # Errors
    /// Returns `MappingError` if an identifier cannot be resolved or, in
    /// strict mode, the variant tag is unknown.
    pub fn map(&self, reference: &PropertyReference) -> Result<PropertyMapping, MappingError> {
        let (value_rule, value) = self.value(reference)?;
        let (type_rule, type_tag) = self.type_tag(reference)?;

        Ok(PropertyMapping {
            name: reference.property_name.clone(),
            value,
            type_tag,
            value_rule,
            type_rule,
        })
    }

    /// Computes the initializer value and the name of the rule that fired.
    ///
    /// # Errors
    /// Returns `MappingError` if the matching rule fails.
    pub fn value(
        &self,
        reference: &PropertyReference,
    ) -> Result<(&'static str, PropertyValue), MappingError> {
        VALUE_RULES.apply(reference, &self.ctx)
    }

    /// Computes the type tag and the name of the rule that fired.
    ///
    /// # Errors
    /// Returns `MappingError` if the matching rule fails.
    pub fn type_tag(
        &self,
        reference: &PropertyReference,
    ) -> Result<(&'static str, TypeTag), MappingError> {
        TYPE_RULES.apply(reference, &self.ctx)
    }

    /// Names the value and type rules that apply, without evaluating them.
    #[must_use]
    pub fn explain(reference: &PropertyReference) -> (&'static str, &'static str) {
        (
            VALUE_RULES.select(reference).name,
            TYPE_RULES.select(reference).name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ObjectIdTable;
    use eventgen_model::NodeId;

    fn reference(name: &str, data_type: &str, target: u32) -> PropertyReference {
        PropertyReference::property(name, data_type, NodeId::numeric(target))
    }

    fn map(r: &PropertyReference) -> PropertyMapping {
        let table = ObjectIdTable::standard();
        PropertyMapper::new(&table).map(r).expect("mapping")
    }

    #[test]
    fn test_named_value_rules() {
        let source = map(&reference("SourceNode", "NodeId", 2044));
        assert_eq!(source.value, PropertyValue::SourceNode);
        assert_eq!(source.type_tag, TypeTag::Variant("NodeId".to_string()));

        let severity = map(&reference("Severity", "UInt16", 2051));
        assert_eq!(severity.value, PropertyValue::Severity);
        assert_eq!(severity.type_tag, TypeTag::Variant("UInt16".to_string()));

        let status = map(&reference("Status", "Boolean", 2054));
        assert_eq!(status.value, PropertyValue::False);
        assert_eq!(status.value_rule, "status");

        let message = map(&reference("Message", "LocalizedText", 2050));
        assert_eq!(message.value, PropertyValue::LocalizedMessage);
    }

    #[test]
    fn test_node_reference_value_uses_target() {
        // Target 2042 is `BaseEventType_EventId`; the tag uses data type 17.
        let mapping = map(&reference("Custom", "i=17", 2042));
        assert_eq!(mapping.value, PropertyValue::ObjectId("BaseEventType".to_string()));
        assert_eq!(mapping.type_tag, TypeTag::ObjectId("NodeId".to_string()));
        assert_eq!(mapping.value_rule, "node-reference");
        assert_eq!(mapping.type_rule, "node-reference");
    }

    #[test]
    fn test_fallbacks() {
        let mapping = map(&reference("ServerId", "String", 2055));
        assert_eq!(mapping.value, PropertyValue::Null);
        assert_eq!(mapping.type_tag, TypeTag::Variant("String".to_string()));
        assert_eq!((mapping.value_rule, mapping.type_rule), ("null", "variant"));
    }

    #[test]
    fn test_time_tag_wins_over_data_type() {
        let mapping = map(&reference("ReceiveTime", "UtcTime", 2047));
        assert_eq!(mapping.type_tag, TypeTag::DateTime);

        let local = map(&reference("LocalTime", "i=8912", 3190));
        assert_eq!(local.type_tag, TypeTag::DateTime);
        assert_eq!(local.value, PropertyValue::ObjectId("BaseEventType".to_string()));
    }

    #[test]
    fn test_message_value_with_node_reference_tag() {
        let mapping = map(&reference("Message", "i=21", 2050));
        assert_eq!(mapping.value, PropertyValue::LocalizedMessage);
        assert_eq!(mapping.type_tag, TypeTag::ObjectId("LocalizedText".to_string()));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let r = reference("Custom", "i=17", 2042);
        assert_eq!(map(&r), map(&r));
    }

    #[test]
    fn test_unknown_identifier() {
        let table = ObjectIdTable::standard();
        let mapper = PropertyMapper::new(&table);

        let err = mapper
            .map(&reference("Custom", "i=17", 424_242))
            .expect_err("unknown target");
        assert_eq!(
            err,
            MappingError::UnknownIdentifier {
                id: 424_242,
                rule: "node-reference"
            }
        );

        let err = mapper
            .map(&reference("Status", "i=424243", 2054))
            .expect_err("unknown data type");
        assert!(matches!(err, MappingError::UnknownIdentifier { id: 424_243, .. }));
    }

    #[test]
    fn test_unresolvable_target() {
        let table = ObjectIdTable::standard();
        let r = PropertyReference::property(
            "Custom",
            "i=17",
            NodeId::parse("ns=1;s=Pump.Id").expect("node id"),
        );
        let err = PropertyMapper::new(&table).map(&r).expect_err("string id");
        assert!(matches!(err, MappingError::UnresolvableTarget { .. }));
    }

    #[test]
    fn test_strict_variant_types() {
        let table = ObjectIdTable::standard();
        let r = reference("Duration", "Duration", 9000);

        let lenient = PropertyMapper::new(&table).map(&r).expect("pass-through");
        assert_eq!(lenient.type_tag, TypeTag::Variant("Duration".to_string()));
        assert!(!lenient.type_tag.is_standard());

        let err = PropertyMapper::new(&table)
            .strict_variant_types(true)
            .map(&r)
            .expect_err("strict");
        assert_eq!(
            err,
            MappingError::InvalidVariantType {
                data_type: "Duration".to_string()
            }
        );
    }

    #[test]
    fn test_explain() {
        let r = reference("Message", "i=21", 2050);
        assert_eq!(
            PropertyMapper::explain(&r),
            ("message", "node-reference")
        );
        assert_eq!(
            PropertyMapper::explain(&reference("ServerId", "String", 2055)),
            ("null", "variant")
        );
    }

    #[test]
    fn test_named_data_type_action_falls_back_to_variant() {
        let table = ObjectIdTable::standard();
        let ctx = RuleContext {
            resolver: &table,
            strict_variant_types: false,
        };
        let r = reference("Custom", "Double", 2042);

        assert_eq!(
            data_type_object_id(&r, &ctx),
            Ok(TypeTag::Variant("Double".to_string()))
        );
    }

    #[test]
    fn test_type_segment() {
        assert_eq!(type_segment("BaseEventType_SourceNode"), "BaseEventType");
        assert_eq!(type_segment("NodeId"), "NodeId");
        assert_eq!(type_segment("A_B_C"), "A");
    }
}
