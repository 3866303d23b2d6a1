//! Wrapper strategies for generated methods.
//!
//! Most terms forward their arguments untouched. Terms that take optional
//! arguments either detect a trailing options table at call time or, when
//! the options table cannot be told apart from a positional argument, get a
//! wrapper with a fixed parameter list.

use std::collections::{BTreeMap, BTreeSet};

/// Terms whose call may end with an options table
pub const REQL_OPTIONS_TAIL: [&str; 21] = [
    "CIRCLE",
    "DELETE",
    "DISTINCT",
    "EQ_JOIN",
    "FILTER",
    "GET_ALL",
    "GET_INTERSECTING",
    "GET_NEAREST",
    "GROUP",
    "HTTP",
    "INDEX_CREATE",
    "INDEX_RENAME",
    "ISO8601",
    "JAVASCRIPT",
    "ORDER_BY",
    "RANDOM",
    "REPLACE",
    "SLICE",
    "TABLE",
    "TABLE_CREATE",
    "UPDATE",
];

/// Terms taking exactly N positional arguments followed by options
pub const REQL_FIXED_ARITY: [(&str, usize); 7] = [
    ("BETWEEN", 3),
    ("BETWEEN_DEPRECATED", 3),
    ("DISTANCE", 2),
    ("DURING", 3),
    ("FILTER", 2),
    ("INSERT", 2),
    ("UPDATE", 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperStrategy {
    /// `name(...)` forwards everything after an empty options table
    Plain,
    /// Options split off the argument list by the driver's `get_opts`
    OptionsTail,
    /// `name(arg0, .., argN-1, opts)`
    FixedArity(usize),
}

/// Identifier to wrapper strategy lookup.
///
/// A term listed both as options-tail and fixed-arity (FILTER and UPDATE in
/// the ReQL tables) uses its fixed-arity wrapper.
#[derive(Debug, Clone, Default)]
pub struct ArityTable {
    options_tail: BTreeSet<String>,
    fixed_arity: BTreeMap<String, usize>,
}

impl ArityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ReQL driver's tables
    pub fn reql() -> Self {
        let table = REQL_OPTIONS_TAIL
            .iter()
            .fold(Self::new(), |table, id| table.with_options_tail(*id));
        REQL_FIXED_ARITY
            .iter()
            .fold(table, |table, (id, arity)| table.with_fixed_arity(*id, *arity))
    }

    pub fn with_options_tail(mut self, identifier: impl Into<String>) -> Self {
        self.options_tail.insert(identifier.into());
        self
    }

    pub fn with_fixed_arity(mut self, identifier: impl Into<String>, arity: usize) -> Self {
        self.fixed_arity.insert(identifier.into(), arity);
        self
    }

    pub fn strategy(&self, identifier: &str) -> WrapperStrategy {
        if let Some(&arity) = self.fixed_arity.get(identifier) {
            WrapperStrategy::FixedArity(arity)
        } else if self.options_tail.contains(identifier) {
            WrapperStrategy::OptionsTail
        } else {
            WrapperStrategy::Plain
        }
    }

    /// Identifiers present in both tables
    pub fn dual_listed(&self) -> impl Iterator<Item = &str> {
        self.options_tail
            .iter()
            .filter(|id| self.fixed_arity.contains_key(id.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reql_strategies() {
        let table = ArityTable::reql();
        assert_eq!(table.strategy("ADD"), WrapperStrategy::Plain);
        assert_eq!(table.strategy("GET_ALL"), WrapperStrategy::OptionsTail);
        assert_eq!(table.strategy("TABLE"), WrapperStrategy::OptionsTail);
        assert_eq!(table.strategy("BETWEEN"), WrapperStrategy::FixedArity(3));
        assert_eq!(table.strategy("DISTANCE"), WrapperStrategy::FixedArity(2));
        assert_eq!(table.strategy("INSERT"), WrapperStrategy::FixedArity(2));
    }

    #[test]
    fn test_fixed_arity_wins_for_dual_listed() {
        let table = ArityTable::reql();
        let dual: Vec<&str> = table.dual_listed().collect();
        assert_eq!(dual, vec!["FILTER", "UPDATE"]);
        assert_eq!(table.strategy("FILTER"), WrapperStrategy::FixedArity(2));
        assert_eq!(table.strategy("UPDATE"), WrapperStrategy::FixedArity(2));
    }

    #[test]
    fn test_precedence_independent_of_insertion_order() {
        let table = ArityTable::new()
            .with_fixed_arity("FILTER", 2)
            .with_options_tail("FILTER");
        assert_eq!(table.strategy("FILTER"), WrapperStrategy::FixedArity(2));
    }
}
