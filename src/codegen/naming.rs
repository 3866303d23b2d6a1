//! Method names for generated terms.
//!
//! A term's method name is its lowercased identifier, except for a handful
//! of terms whose lowercased name is a Lua keyword (`and`, `not`, `or`) or
//! reads poorly in the driver's API (`bracket`, `funcall`, `javascript`).

use crate::error::{Error, Result};
use crate::reql::TermCatalog;
use std::collections::{BTreeMap, HashMap};

/// Method names that replace the lowercased identifier
pub const REQL_NAME_OVERRIDES: [(&str, &str); 7] = [
    ("AND", "and_"),
    ("BRACKET", "index"),
    ("ERROR", "error_"),
    ("FUNCALL", "do_"),
    ("JAVASCRIPT", "js"),
    ("NOT", "not_"),
    ("OR", "or_"),
];

/// Identifier to method name mapping
#[derive(Debug, Clone)]
pub struct NameResolver {
    overrides: BTreeMap<String, String>,
}

impl NameResolver {
    pub fn new<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Method name for a single identifier
    pub fn method_name(&self, identifier: &str) -> String {
        match self.overrides.get(identifier) {
            Some(name) => name.clone(),
            None => identifier.to_lowercase(),
        }
    }

    /// Resolve every term of the catalog, in catalog order.
    ///
    /// Fails if a name comes out empty or if two identifiers map to the
    /// same name, since the generated method table would silently drop one
    /// of them.
    pub fn resolve(&self, catalog: &TermCatalog) -> Result<Vec<String>> {
        let mut owners: HashMap<String, &str> = HashMap::with_capacity(catalog.len());
        let mut names = Vec::with_capacity(catalog.len());

        for identifier in catalog.identifiers() {
            let name = self.method_name(identifier);
            if name.is_empty() {
                return Err(Error::Protodef(format!(
                    "term {} resolves to an empty method name",
                    identifier
                )));
            }
            if let Some(first) = owners.insert(name.clone(), identifier) {
                return Err(Error::NameCollision {
                    name,
                    first: first.to_string(),
                    second: identifier.to_string(),
                });
            }
            names.push(name);
        }

        Ok(names)
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(REQL_NAME_OVERRIDES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reql::ProtoEnum;

    fn catalog(ids: &[&str]) -> TermCatalog {
        let types: ProtoEnum = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), i as i64 + 2))
            .collect();
        TermCatalog::from_enum(&types).unwrap()
    }

    #[test]
    fn test_default_lowercases() {
        let resolver = NameResolver::default();
        assert_eq!(resolver.method_name("GET_ALL"), "get_all");
        assert_eq!(resolver.method_name("TABLE"), "table");
    }

    #[test]
    fn test_overrides() {
        let resolver = NameResolver::default();
        assert_eq!(resolver.method_name("AND"), "and_");
        assert_eq!(resolver.method_name("BRACKET"), "index");
        assert_eq!(resolver.method_name("ERROR"), "error_");
        assert_eq!(resolver.method_name("FUNCALL"), "do_");
        assert_eq!(resolver.method_name("JAVASCRIPT"), "js");
        assert_eq!(resolver.method_name("NOT"), "not_");
        assert_eq!(resolver.method_name("OR"), "or_");
    }

    #[test]
    fn test_resolve_in_catalog_order() {
        let names = NameResolver::default()
            .resolve(&catalog(&["OR", "ADD", "BRACKET"]))
            .unwrap();
        assert_eq!(names, vec!["add", "index", "or_"]);
    }

    #[test]
    fn test_collision_detected() {
        // INDEX lowercases to the name BRACKET is overridden to
        let err = NameResolver::default()
            .resolve(&catalog(&["BRACKET", "INDEX"]))
            .unwrap_err();
        match err {
            Error::NameCollision { name, first, second } => {
                assert_eq!(name, "index");
                assert_eq!(first, "BRACKET");
                assert_eq!(second, "INDEX");
            }
            other => panic!("Expected name collision, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_override_rejected() {
        let resolver = NameResolver::new([("ADD", "")]);
        assert!(matches!(
            resolver.resolve(&catalog(&["ADD"])),
            Err(Error::Protodef(_))
        ));
    }
}
