//! Numeric identifier to symbolic name lookup.
//!
//! Generated initializers refer to standard nodes by their symbolic constant
//! names (`BaseEventType`, `NodeId`, ...). The mapping itself is supplied
//! from outside; [`ObjectIdTable::standard`] carries the subset of the
//! standard namespace that event type hierarchies reference.

use crate::error::{ResolverError, UnknownIdentifier};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Read-only lookup from numeric identifiers to symbolic names.
pub trait IdentifierResolver {
    /// Returns the symbol registered for `id`.
    fn symbol(&self, id: u32) -> Option<&str>;

    /// Returns the symbol registered for `id`.
    ///
    /// # Errors
    /// Returns `UnknownIdentifier` if nothing is registered.
    fn resolve(&self, id: u32) -> Result<&str, UnknownIdentifier> {
        self.symbol(id).ok_or(UnknownIdentifier(id))
    }
}

impl<S: BuildHasher> IdentifierResolver for HashMap<u32, String, S> {
    fn symbol(&self, id: u32) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

/// Owned identifier table.
#[derive(Debug, Clone, Default)]
pub struct ObjectIdTable {
    names: HashMap<u32, String>,
}

impl ObjectIdTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the built-in standard namespace table.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_OBJECT_IDS.iter().copied())
    }

    /// Creates a table from `(id, symbol)` pairs. Later pairs win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            names: pairs.into_iter().map(|(id, s)| (id, s.into())).collect(),
        }
    }

    /// Parses a `Name,Id,NodeClass` listing.
    ///
    /// Blank lines and lines starting with `#` are skipped; the node class
    /// column is optional.
    ///
    /// # Errors
    /// Returns `ResolverError::InvalidCsvLine` for lines without a name and
    /// a numeric id.
    pub fn from_csv(content: &str) -> Result<Self, ResolverError> {
        let mut table = Self::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.split(',').map(str::trim);
            let name = columns.next().filter(|n| !n.is_empty());
            let id = columns.next().and_then(|id| id.parse().ok());

            match (name, id) {
                (Some(name), Some(id)) => table.insert(id, name),
                _ => {
                    return Err(ResolverError::InvalidCsvLine {
                        line: idx + 1,
                        content: line.to_string(),
                    });
                }
            }
        }

        Ok(table)
    }

    /// Registers a symbol, replacing any previous one.
    pub fn insert(&mut self, id: u32, symbol: impl Into<String>) {
        self.names.insert(id, symbol.into());
    }

    /// Merges another table into this one. Entries from `other` win.
    #[must_use]
    pub fn extend(mut self, other: Self) -> Self {
        self.names.extend(other.names);
        self
    }

    /// Returns the number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IdentifierResolver for ObjectIdTable {
    fn symbol(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Standard namespace symbols used by event type hierarchies.
pub const STANDARD_OBJECT_IDS: &[(u32, &str)] = &[
    (1, "Boolean"),
    (2, "SByte"),
    (3, "Byte"),
    (4, "Int16"),
    (5, "UInt16"),
    (6, "Int32"),
    (7, "UInt32"),
    (8, "Int64"),
    (9, "UInt64"),
    (10, "Float"),
    (11, "Double"),
    (12, "String"),
    (13, "DateTime"),
    (14, "Guid"),
    (15, "ByteString"),
    (16, "XmlElement"),
    (17, "NodeId"),
    (18, "ExpandedNodeId"),
    (19, "StatusCode"),
    (20, "QualifiedName"),
    (21, "LocalizedText"),
    (22, "Structure"),
    (23, "DataValue"),
    (24, "BaseDataType"),
    (25, "DiagnosticInfo"),
    (26, "Number"),
    (27, "Integer"),
    (28, "UInteger"),
    (29, "Enumeration"),
    (30, "Image"),
    (58, "BaseObjectType"),
    (61, "FolderType"),
    (62, "BaseVariableType"),
    (63, "BaseDataVariableType"),
    (68, "PropertyType"),
    (256, "IdType"),
    (257, "NodeClass"),
    (290, "Duration"),
    (291, "NumericRange"),
    (294, "UtcTime"),
    (295, "LocaleId"),
    (296, "Argument"),
    (852, "ServerState"),
    (2004, "ServerType"),
    (2041, "BaseEventType"),
    (2042, "BaseEventType_EventId"),
    (2043, "BaseEventType_EventType"),
    (2044, "BaseEventType_SourceNode"),
    (2045, "BaseEventType_SourceName"),
    (2046, "BaseEventType_Time"),
    (2047, "BaseEventType_ReceiveTime"),
    (2050, "BaseEventType_Message"),
    (2051, "BaseEventType_Severity"),
    (2052, "AuditEventType"),
    (2053, "AuditEventType_ActionTimeStamp"),
    (2054, "AuditEventType_Status"),
    (2055, "AuditEventType_ServerId"),
    (2056, "AuditEventType_ClientAuditEntryId"),
    (2057, "AuditEventType_ClientUserId"),
    (2058, "AuditSecurityEventType"),
    (2059, "AuditChannelEventType"),
    (2060, "AuditOpenSecureChannelEventType"),
    (2069, "AuditSessionEventType"),
    (2071, "AuditCreateSessionEventType"),
    (2075, "AuditActivateSessionEventType"),
    (2078, "AuditCancelEventType"),
    (2080, "AuditCertificateEventType"),
    (2090, "AuditNodeManagementEventType"),
    (2091, "AuditAddNodesEventType"),
    (2093, "AuditDeleteNodesEventType"),
    (2095, "AuditAddReferencesEventType"),
    (2097, "AuditDeleteReferencesEventType"),
    (2099, "AuditUpdateEventType"),
    (2100, "AuditWriteUpdateEventType"),
    (2104, "AuditHistoryUpdateEventType"),
    (2127, "AuditUpdateMethodEventType"),
    (2130, "SystemEventType"),
    (2131, "DeviceFailureEventType"),
    (2132, "BaseModelChangeEventType"),
    (2133, "GeneralModelChangeEventType"),
    (2311, "TransitionEventType"),
    (2315, "AuditUpdateStateEventType"),
    (2738, "SemanticChangeEventType"),
    (2782, "ConditionType"),
    (2787, "RefreshStartEventType"),
    (2788, "RefreshEndEventType"),
    (2789, "RefreshRequiredEventType"),
    (2915, "AlarmConditionType"),
    (3035, "EventQueueOverflowEventType"),
    (3190, "BaseEventType_LocalTime"),
    (8912, "TimeZoneDataType"),
    (11436, "ProgressEventType"),
    (11446, "SystemStatusChangeEventType"),
    (11696, "SystemStatusChangeEventType_SystemState"),
];
