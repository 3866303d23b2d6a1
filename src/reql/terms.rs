//! ReQL term catalog.
//!
//! The catalog is the authoritative list of terms that receive generated
//! code. It is built from `Term.TermType` of the protocol definition and is
//! ordered lexicographically by identifier, so every fragment generated from
//! it comes out in the same order on every run.
//!
//! # Reserved Terms
//!
//! - **DATUM**: raw values are encoded directly by the driver
//! - **IMPLICIT_VAR**: `r.row` is built by the driver's function wrapper
//!
//! Neither gets a class or a method.
//!
//! # Example
//!
//! ```rust,ignore
//! let catalog = TermCatalog::from_protodef(&protodef)?;
//! assert!(catalog.get("DATUM").is_none());
//! assert_eq!(catalog.get("FILTER").unwrap().tag, 39);
//! ```

use super::protodef::{ProtoEnum, ProtocolDef};
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Terms the driver handles by hand
pub const RESERVED_TERMS: [&str; 2] = ["DATUM", "IMPLICIT_VAR"];

/// One ReQL operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    /// Uppercase protocol name (e.g. "GET_ALL")
    pub identifier: String,
    /// Wire protocol opcode
    pub tag: i64,
}

impl Term {
    pub fn new(identifier: impl Into<String>, tag: i64) -> Self {
        Self {
            identifier: identifier.into(),
            tag,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

/// `[A-Z_][A-Z0-9_]*`, so the identifier is usable as a Lua local
fn is_term_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => chars
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
        _ => false,
    }
}

/// Sorted list of generated terms
#[derive(Debug, Clone, Default)]
pub struct TermCatalog {
    terms: Vec<Term>,
}

impl TermCatalog {
    /// Build the catalog from a protocol definition's term enumeration.
    ///
    /// # Errors
    ///
    /// * `Error::Protodef` - an identifier is not an uppercase Lua name
    /// * `Error::DuplicateTag` - two identifiers share a wire tag
    pub fn from_protodef(protodef: &ProtocolDef) -> Result<Self> {
        Self::from_enum(protodef.term_types())
    }

    pub fn from_enum(term_types: &ProtoEnum) -> Result<Self> {
        let mut seen: HashMap<i64, &str> = HashMap::with_capacity(term_types.len());
        for (name, tag) in term_types.iter() {
            if !is_term_identifier(name) {
                return Err(Error::Protodef(format!(
                    "invalid term identifier '{}'",
                    name
                )));
            }
            if let Some(first) = seen.insert(tag, name) {
                return Err(Error::DuplicateTag {
                    tag,
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
        }

        let mut terms: Vec<Term> = term_types
            .iter()
            .filter(|(name, _)| !RESERVED_TERMS.contains(name))
            .map(|(name, tag)| Term::new(name, tag))
            .collect();
        terms.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        debug!(
            terms = terms.len(),
            skipped = term_types.len() - terms.len(),
            "Loaded term catalog"
        );
        Ok(Self { terms })
    }

    /// Terms in identifier order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.identifier.as_str())
    }

    pub fn get(&self, identifier: &str) -> Option<&Term> {
        self.terms
            .binary_search_by(|t| t.identifier.as_str().cmp(identifier))
            .ok()
            .map(|i| &self.terms[i])
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
