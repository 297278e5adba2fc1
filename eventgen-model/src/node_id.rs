//! Node identifiers.
//!
//! Textual forms follow the information model notation: an optional
//! `ns=<index>;` prefix followed by `i=`, `s=`, `g=` or `b=` and the
//! identifier body.

use crate::error::ModelError;
use std::fmt;
use std::str::FromStr;

/// Identifier body of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Numeric identifier (`i=`).
    Numeric(u32),
    /// String identifier (`s=`).
    String(String),
    /// GUID identifier (`g=`), kept in its textual form.
    Guid(String),
    /// Opaque identifier (`b=`), kept base64-encoded.
    Opaque(String),
}

/// Unique identifier of a node within an information model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Namespace index.
    pub namespace: u16,
    /// Identifier within the namespace.
    pub identifier: Identifier,
}

impl NodeId {
    /// Creates a numeric node id in the standard namespace.
    #[must_use]
    pub const fn numeric(id: u32) -> Self {
        Self {
            namespace: 0,
            identifier: Identifier::Numeric(id),
        }
    }

    /// Creates a node id in the given namespace.
    #[must_use]
    pub const fn new(namespace: u16, identifier: Identifier) -> Self {
        Self {
            namespace,
            identifier,
        }
    }

    /// Returns the integer part for numeric ids in the standard namespace.
    ///
    /// Only these can be resolved against the standard identifier table.
    #[must_use]
    pub fn standard_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(id) if self.namespace == 0 => Some(id),
            _ => None,
        }
    }

    /// Parses the textual form, returning `None` if it is malformed.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail.split_once(';')?;
                (ns.parse().ok()?, rest)
            }
            None => (0, s),
        };

        let (kind, body) = rest.split_once('=')?;
        let identifier = match kind {
            "i" => Identifier::Numeric(body.parse().ok()?),
            "s" => Identifier::String(body.to_string()),
            "g" if !body.is_empty() => Identifier::Guid(body.to_string()),
            "b" => Identifier::Opaque(body.to_string()),
            _ => return None,
        };

        Some(Self {
            namespace,
            identifier,
        })
    }
}

impl FromStr for NodeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidNodeId {
            value: s.to_string(),
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(id) => write!(f, "i={id}"),
            Identifier::String(s) => write!(f, "s={s}"),
            Identifier::Guid(g) => write!(f, "g={g}"),
            Identifier::Opaque(b) => write!(f, "b={b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_numeric() {
        let id = NodeId::parse("i=2041").expect("valid id");
        assert_eq!(id, NodeId::numeric(2041));
        assert_eq!(id.standard_numeric(), Some(2041));
        assert_eq!(id.to_string(), "i=2041");
    }

    #[test]
    fn test_parse_namespaced() {
        let id = NodeId::parse("ns=2;i=5000").expect("valid id");
        assert_eq!(id.namespace, 2);
        assert_eq!(id.identifier, Identifier::Numeric(5000));
        assert_eq!(id.standard_numeric(), None);
        assert_eq!(id.to_string(), "ns=2;i=5000");

        let id = NodeId::parse("ns=1;s=Boiler.Temperature").expect("valid id");
        assert_eq!(
            id.identifier,
            Identifier::String("Boiler.Temperature".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(NodeId::parse("NodeId").is_none());
        assert!(NodeId::parse("i=abc").is_none());
        assert!(NodeId::parse("ns=x;i=1").is_none());
        assert!(NodeId::parse("q=1").is_none());
        assert!("i=".parse::<NodeId>().is_err());
    }
}
