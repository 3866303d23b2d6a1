//! ReQL protocol definition.
//!
//! The protocol definition is a JSON document mirroring the nesting of the
//! ReQL wire protocol messages:
//!
//! ```json
//! {
//!   "Query":    { "QueryType":    { "START": 1, "CONTINUE": 2 } },
//!   "Response": { "ResponseType": { "SUCCESS_ATOM": 1 } },
//!   "Term":     { "TermType":     { "DATUM": 1, "MAKE_ARRAY": 2 } }
//! }
//! ```
//!
//! Only `Term.TermType` is interpreted by the generator. The query and
//! response enumerations are substituted verbatim into templates.

use crate::error::{Error, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// One protocol enumeration: identifier to wire tag.
///
/// Deserializing rejects an identifier that appears twice in the same
/// enumeration instead of keeping the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProtoEnum {
    values: BTreeMap<String, i64>,
}

impl ProtoEnum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, tag: i64) {
        self.values.insert(name.into(), tag);
    }

    /// Tag for `name`, if the enumeration defines it
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Entries in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(name, tag)| (name.as_str(), *tag))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, i64)> for ProtoEnum {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

struct ProtoEnumVisitor;

impl<'de> Visitor<'de> for ProtoEnumVisitor {
    type Value = ProtoEnum;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of identifiers to integer tags")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<ProtoEnum, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut values = BTreeMap::new();
        while let Some((name, tag)) = map.next_entry::<String, i64>()? {
            match values.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(de::Error::custom(format!(
                        "duplicate identifier {}",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(tag);
                }
            }
        }
        Ok(ProtoEnum { values })
    }
}

impl<'de> Deserialize<'de> for ProtoEnum {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ProtoEnumVisitor)
    }
}

/// Renders the enumeration as a Lua table constructor, ordered by tag.
impl fmt::Display for ProtoEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(&str, i64)> = self.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        writeln!(f, "{{")?;
        for (name, tag) in entries {
            writeln!(f, "  {} = {},", name, tag)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMessage {
    #[serde(rename = "QueryType")]
    pub query_type: ProtoEnum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(rename = "ResponseType")]
    pub response_type: ProtoEnum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermMessage {
    #[serde(rename = "TermType")]
    pub term_type: ProtoEnum,
}

/// The parsed protocol definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolDef {
    #[serde(rename = "Query")]
    pub query: QueryMessage,
    #[serde(rename = "Response")]
    pub response: ResponseMessage,
    #[serde(rename = "Term")]
    pub term: TermMessage,
}

impl ProtocolDef {
    /// Parse a protocol definition from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Protodef(e.to_string()))
    }

    /// Read and parse the protocol definition at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Protodef(format!("{}: {}", path.display(), e)))
    }

    pub fn query_types(&self) -> &ProtoEnum {
        &self.query.query_type
    }

    pub fn response_types(&self) -> &ProtoEnum {
        &self.response.response_type
    }

    pub fn term_types(&self) -> &ProtoEnum {
        &self.term.term_type
    }
}
