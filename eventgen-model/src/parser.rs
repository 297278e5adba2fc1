//! NodeSet2 XML loader.
//!
//! This module reads `UAObjectType` and `UAVariable` elements from a nodeset
//! document and builds the [`EventModel`] of every object type that derives
//! from `BaseEventType`.

use crate::error::ParseError;
use crate::model::{DataTypeRef, EventModel, EventNode, PropertyReference, ReferenceKind};
use crate::node_id::NodeId;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{HashMap, HashSet};

/// Node id of `BaseEventType`, the root of every event hierarchy.
pub const BASE_EVENT_TYPE: NodeId = NodeId::numeric(2041);

/// Node class of a raw nodeset element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeClass {
    ObjectType,
    Variable,
}

/// Reference as written in the nodeset.
#[derive(Debug, Clone)]
struct RawReference {
    kind: ReferenceKind,
    is_forward: bool,
    target: NodeId,
}

/// Node as written in the nodeset, before event filtering.
#[derive(Debug, Clone)]
struct RawNode {
    class: NodeClass,
    node_id: NodeId,
    browse_name: String,
    data_type: Option<String>,
    description: Option<String>,
    references: Vec<RawReference>,
}

impl RawNode {
    /// Returns the supertype declared by an inverse `HasSubtype` reference.
    fn supertype(&self) -> Option<&NodeId> {
        self.references
            .iter()
            .find(|r| r.kind == ReferenceKind::HasSubtype && !r.is_forward)
            .map(|r| &r.target)
    }
}

/// Parses a NodeSet2 document into an event model.
///
/// # Arguments
/// * `xml` - NodeSet2 XML content
///
/// # Returns
/// Event types in document order.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, a node is missing required
/// attributes, or a `HasProperty` reference has no target variable.
pub fn parse_nodeset(xml: &str) -> Result<EventModel, ParseError> {
    let raw = read_nodes(xml)?;
    build_model(&raw)
}

/// Parses a NodeSet2 file into an event model.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_nodeset_file(path: &std::path::Path) -> Result<EventModel, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_nodeset(&xml)
}

/// Reads every object type and variable element.
fn read_nodes(xml: &str) -> Result<Vec<RawNode>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nodes = Vec::new();
    let mut saw_nodeset = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "UANodeSet" => saw_nodeset = true,
                    "UAObjectType" => {
                        nodes.push(parse_node(&mut reader, e, NodeClass::ObjectType)?);
                    }
                    "UAVariable" => {
                        nodes.push(parse_node(&mut reader, e, NodeClass::Variable)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "UANodeSet" => saw_nodeset = true,
                    "UAObjectType" => {
                        nodes.push(parse_node_attributes(e, NodeClass::ObjectType)?);
                    }
                    "UAVariable" => {
                        nodes.push(parse_node_attributes(e, NodeClass::Variable)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !saw_nodeset {
        return Err(ParseError::InvalidStructure {
            message: "No UANodeSet element found".to_string(),
        });
    }

    Ok(nodes)
}

/// Parses the attributes of a node element.
fn parse_node_attributes(e: &BytesStart<'_>, class: NodeClass) -> Result<RawNode, ParseError> {
    let element = match class {
        NodeClass::ObjectType => "UAObjectType",
        NodeClass::Variable => "UAVariable",
    };

    let mut node_id = None;
    let mut browse_name = None;
    let mut data_type = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "NodeId" => {
                node_id = Some(
                    NodeId::parse(value)
                        .ok_or_else(|| ParseError::invalid_attr(element, "NodeId", value))?,
                )
            }
            "BrowseName" => browse_name = Some(strip_namespace_prefix(value).to_string()),
            "DataType" => data_type = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(RawNode {
        class,
        node_id: node_id.ok_or_else(|| ParseError::missing_attr(element, "NodeId"))?,
        browse_name: browse_name.ok_or_else(|| ParseError::missing_attr(element, "BrowseName"))?,
        data_type,
        description: None,
        references: Vec::new(),
    })
}

/// Parses a node element with content.
fn parse_node(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    class: NodeClass,
) -> Result<RawNode, ParseError> {
    let mut node = parse_node_attributes(e, class)?;
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "Description" => {
                        let text = read_text(reader)?;
                        if !text.is_empty() {
                            node.description = Some(text);
                        }
                        depth -= 1; // read_text consumes the end tag
                    }
                    "Reference" => {
                        if let Some(reference) = parse_reference(reader, e)? {
                            node.references.push(reference);
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(node)
}

/// Parses a `Reference` element, returning `None` for non-node targets.
fn parse_reference(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<Option<RawReference>, ParseError> {
    let mut kind = None;
    let mut is_forward = true;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "ReferenceType" => kind = Some(ReferenceKind::parse(value)),
            "IsForward" => {
                is_forward = value
                    .parse()
                    .map_err(|_| ParseError::invalid_attr("Reference", "IsForward", value))?
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| ParseError::missing_attr("Reference", "ReferenceType"))?;
    let text = read_text(reader)?;

    // Alias targets (e.g. `HasTypeDefinition` to a named type) are not node ids.
    Ok(NodeId::parse(&text).map(|target| RawReference {
        kind,
        is_forward,
        target,
    }))
}

/// Reads text content up to the end of the current element.
///
/// Trimming is switched off while reading so whitespace next to entity
/// references survives; only the joined text is trimmed.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    reader.config_mut().trim_text(false);
    let text = collect_text(reader);
    reader.config_mut().trim_text(true);
    Ok(text?.trim().to_string())
}

fn collect_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                text.push_str(std::str::from_utf8(t.as_ref())?);
            }
            Ok(Event::CData(ref t)) => {
                text.push_str(std::str::from_utf8(t.as_ref())?);
            }
            Ok(Event::GeneralRef(ref r)) => {
                let name = std::str::from_utf8(r.as_ref())?;
                let c = resolve_entity(name).ok_or_else(|| ParseError::InvalidStructure {
                    message: format!("unknown entity reference '&{name};'"),
                })?;
                text.push(c);
            }
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Resolves a predefined entity or a character reference by name.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

/// Builds the event model from raw nodes.
fn build_model(raw: &[RawNode]) -> Result<EventModel, ParseError> {
    let by_id: HashMap<&NodeId, &RawNode> = raw.iter().map(|n| (&n.node_id, n)).collect();
    let mut model = EventModel::new();

    for node in raw.iter().filter(|n| n.class == NodeClass::ObjectType) {
        if !derives_from_base_event(node, &by_id) {
            continue;
        }

        let browse_name = event_name(&node.browse_name).to_string();
        let parent = if node.node_id == BASE_EVENT_TYPE {
            None
        } else {
            node.supertype().cloned()
        };

        let mut event = EventNode::new(node.node_id.clone(), browse_name, parent);
        event.description = node.description.clone();

        for reference in node.references.iter().filter(|r| r.is_forward) {
            if reference.kind == ReferenceKind::HasSubtype {
                continue;
            }
            event.add_reference(resolve_reference(&event.browse_name, reference, &by_id)?);
        }

        model.add_node(event)?;
    }

    Ok(model)
}

/// Turns a raw forward reference into a property reference.
fn resolve_reference(
    event: &str,
    reference: &RawReference,
    by_id: &HashMap<&NodeId, &RawNode>,
) -> Result<PropertyReference, ParseError> {
    let target = by_id
        .get(&reference.target)
        .filter(|t| t.class == NodeClass::Variable);

    match (&reference.kind, target) {
        (ReferenceKind::HasProperty, Some(variable)) => Ok(PropertyReference {
            reference_kind: ReferenceKind::HasProperty,
            property_name: variable.browse_name.clone(),
            data_type: DataTypeRef::parse(variable.data_type.as_deref().unwrap_or("BaseDataType")),
            target_node_id: reference.target.clone(),
        }),
        (ReferenceKind::HasProperty, None) => Err(ParseError::DanglingReference {
            event: event.to_string(),
            target: reference.target.to_string(),
        }),
        (kind, target) => Ok(PropertyReference {
            reference_kind: kind.clone(),
            property_name: target.map(|t| t.browse_name.clone()).unwrap_or_default(),
            data_type: DataTypeRef::Named(String::new()),
            target_node_id: reference.target.clone(),
        }),
    }
}

/// Returns true if the supertype chain of `node` reaches `BaseEventType`.
fn derives_from_base_event(node: &RawNode, by_id: &HashMap<&NodeId, &RawNode>) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(node);

    while let Some(n) = current {
        if n.node_id == BASE_EVENT_TYPE {
            return true;
        }
        if !visited.insert(&n.node_id) {
            return false;
        }
        current = n.supertype().and_then(|p| by_id.get(p).copied());
    }

    false
}

/// Removes a `<index>:` namespace prefix from a browse name.
fn strip_namespace_prefix(name: &str) -> &str {
    match name.split_once(':') {
        Some((ns, rest)) if ns.bytes().all(|b| b.is_ascii_digit()) => rest,
        _ => name,
    }
}

/// Derives the event name from its type browse name.
fn event_name(type_name: &str) -> &str {
    type_name.strip_suffix("Type").unwrap_or(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_NODESET: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<UANodeSet xmlns="http://opcfoundation.org/UA/2011/03/UANodeSet.xsd">
    <Aliases>
        <Alias Alias="Boolean">i=1</Alias>
        <Alias Alias="HasProperty">i=46</Alias>
    </Aliases>
    <UAObjectType NodeId="i=58" BrowseName="BaseObjectType">
        <DisplayName>BaseObjectType</DisplayName>
    </UAObjectType>
    <UAObjectType NodeId="i=2041" BrowseName="BaseEventType" IsAbstract="true">
        <DisplayName>BaseEventType</DisplayName>
        <Description>The base type for all events.</Description>
        <References>
            <Reference ReferenceType="HasProperty">i=2044</Reference>
            <Reference ReferenceType="HasSubtype" IsForward="false">i=58</Reference>
        </References>
    </UAObjectType>
    <UAVariable NodeId="i=2044" BrowseName="SourceNode" ParentNodeId="i=2041" DataType="NodeId">
        <DisplayName>SourceNode</DisplayName>
        <References>
            <Reference ReferenceType="HasTypeDefinition">i=68</Reference>
        </References>
    </UAVariable>
    <UAObjectType NodeId="i=2052" BrowseName="AuditEventType" IsAbstract="true">
        <DisplayName>AuditEventType</DisplayName>
        <References>
            <Reference ReferenceType="HasProperty">i=2054</Reference>
            <Reference ReferenceType="HasSubtype" IsForward="false">i=2041</Reference>
        </References>
    </UAObjectType>
    <UAVariable NodeId="i=2054" BrowseName="Status" ParentNodeId="i=2052" DataType="Boolean"/>
    <UAObjectType NodeId="i=2004" BrowseName="ServerType">
        <References>
            <Reference ReferenceType="HasSubtype" IsForward="false">i=58</Reference>
        </References>
    </UAObjectType>
</UANodeSet>"#;

    #[test]
    fn test_parse_event_types_only() {
        let model = parse_nodeset(SIMPLE_NODESET).expect("Failed to parse nodeset");

        let names: Vec<_> = model.nodes().iter().map(|n| n.browse_name.as_str()).collect();
        assert_eq!(names, ["BaseEvent", "AuditEvent"]);
    }

    #[test]
    fn test_parse_root_and_parent() {
        let model = parse_nodeset(SIMPLE_NODESET).expect("Failed to parse nodeset");

        let base = model.get(&BASE_EVENT_TYPE).expect("base event");
        assert!(base.is_root());
        assert_eq!(
            base.description.as_deref(),
            Some("The base type for all events.")
        );

        let audit = model.get(&NodeId::numeric(2052)).expect("audit event");
        assert_eq!(audit.parent_node_id, Some(BASE_EVENT_TYPE));
        assert_eq!(audit.description, None);
    }

    #[test]
    fn test_parse_property_references() {
        let model = parse_nodeset(SIMPLE_NODESET).expect("Failed to parse nodeset");

        let base = model.get(&BASE_EVENT_TYPE).expect("base event");
        assert_eq!(base.references.len(), 1);
        let source = &base.references[0];
        assert_eq!(source.reference_kind, ReferenceKind::HasProperty);
        assert_eq!(source.property_name, "SourceNode");
        assert_eq!(source.data_type, DataTypeRef::Named("NodeId".to_string()));
        assert_eq!(source.target_node_id, NodeId::numeric(2044));

        let audit = model.get(&NodeId::numeric(2052)).expect("audit event");
        assert_eq!(audit.references[0].property_name, "Status");
    }

    #[test]
    fn test_parse_dangling_property() {
        let xml = r#"<UANodeSet>
    <UAObjectType NodeId="i=2041" BrowseName="BaseEventType">
        <References>
            <Reference ReferenceType="HasProperty">i=7777</Reference>
        </References>
    </UAObjectType>
</UANodeSet>"#;

        match parse_nodeset(xml) {
            Err(ParseError::DanglingReference { event, target }) => {
                assert_eq!(event, "BaseEvent");
                assert_eq!(target, "i=7777");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_node_id() {
        let xml = r#"<UANodeSet><UAObjectType BrowseName="BaseEventType"/></UANodeSet>"#;
        assert!(matches!(
            parse_nodeset(xml),
            Err(ParseError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_nodeset() {
        assert!(matches!(
            parse_nodeset("<Other/>"),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_parse_keeps_other_references() {
        let xml = r#"<UANodeSet>
    <UAObjectType NodeId="i=2041" BrowseName="BaseEventType"/>
    <UAObjectType NodeId="ns=1;i=1000" BrowseName="1:BoilerEventType">
        <Description>Raised by a boiler.</Description>
        <References>
            <Reference ReferenceType="HasComponent">ns=1;i=1001</Reference>
            <Reference ReferenceType="HasProperty">ns=1;i=1002</Reference>
            <Reference ReferenceType="HasSubtype" IsForward="false">i=2041</Reference>
        </References>
    </UAObjectType>
    <UAObject NodeId="ns=1;i=1001" BrowseName="1:Drum"/>
    <UAVariable NodeId="ns=1;i=1002" BrowseName="1:Pressure" DataType="ns=1;i=3000"/>
</UANodeSet>"#;

        let model = parse_nodeset(xml).expect("Failed to parse nodeset");
        let boiler = model
            .get(&NodeId::parse("ns=1;i=1000").expect("node id"))
            .expect("boiler event");

        assert_eq!(boiler.browse_name, "BoilerEvent");
        assert_eq!(boiler.references.len(), 2);
        assert_eq!(boiler.references[0].reference_kind, ReferenceKind::HasComponent);
        assert!(!boiler.references[0].is_property());

        let pressure = &boiler.references[1];
        assert_eq!(pressure.property_name, "Pressure");
        assert_eq!(pressure.data_type, DataTypeRef::Named("ns=1;i=3000".to_string()));
        assert_eq!(boiler.properties().count(), 1);
    }

    #[test]
    fn test_parse_nodeset_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SIMPLE_NODESET.as_bytes()).expect("write");

        let model = parse_nodeset_file(file.path()).expect("Failed to parse nodeset");
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_parse_description_with_entities() {
        let xml = r#"<UANodeSet>
    <UAObjectType NodeId="i=2041" BrowseName="BaseEventType">
        <Description>Events &amp; alarms &lt;base&gt; &#65;&#x42;</Description>
    </UAObjectType>
</UANodeSet>"#;

        let model = parse_nodeset(xml).expect("Failed to parse nodeset");
        let base = model.get(&BASE_EVENT_TYPE).expect("base event");
        assert_eq!(base.description.as_deref(), Some("Events & alarms <base> AB"));
    }

    #[test]
    fn test_parse_unknown_entity() {
        let xml = r#"<UANodeSet>
    <UAObjectType NodeId="i=2041" BrowseName="BaseEventType">
        <Description>Made by &vendor;</Description>
    </UAObjectType>
</UANodeSet>"#;

        assert!(matches!(
            parse_nodeset(xml),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_entity_resolution() {
        assert_eq!(resolve_entity("quot"), Some('"'));
        assert_eq!(resolve_entity("apos"), Some('\''));
        assert_eq!(resolve_entity("#x20AC"), Some('\u{20AC}'));
        assert_eq!(resolve_entity("#9"), Some('\t'));
        assert_eq!(resolve_entity("#xD800"), None);
        assert_eq!(resolve_entity("nbsp"), None);
    }

    #[test]
    fn test_name_helpers() {
        assert_eq!(strip_namespace_prefix("1:BoilerEventType"), "BoilerEventType");
        assert_eq!(strip_namespace_prefix("Plain"), "Plain");
        assert_eq!(event_name("AuditEventType"), "AuditEvent");
        assert_eq!(event_name("Custom"), "Custom");
    }
}
