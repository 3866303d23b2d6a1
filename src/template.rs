//! Template splicing.
//!
//! Templates are ordinary Lua source with placeholder markers written as
//! Lua block comments, so an unprocessed template still parses:
//!
//! ```lua
//! --[[AstNames]]
//! local ast_methods = {
//!   --[[AstMethods]]
//! }
//! ```
//!
//! A marker is `--[[`, a key of at least one character on the same line,
//! and `]]`. Whitespace around the key is ignored. Everything that is not a
//! marker is copied to the output byte-for-byte.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

const MARKER_OPEN: &[u8] = b"--[[";
const MARKER_CLOSE: &[u8] = b"]]";

/// A placeholder found in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub key: &'a str,
    /// Byte offset of the marker's `--[[`
    pub offset: usize,
}

/// Literal text followed by the marker that ends it, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'a> {
    pub literal: &'a str,
    pub marker: Option<Marker<'a>>,
}

#[derive(Clone, Copy)]
enum State {
    Outside,
    Inside { marker_start: usize, key_start: usize },
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template<'a> {
    pieces: Vec<Piece<'a>>,
}

impl<'a> Template<'a> {
    /// Split `source` into literal text and markers.
    ///
    /// The last piece always carries the text after the final marker and no
    /// marker of its own.
    pub fn parse(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut pieces = Vec::new();
        let mut literal_start = 0;
        let mut state = State::Outside;
        let mut i = 0;

        while i < bytes.len() {
            match state {
                State::Outside => {
                    if bytes[i..].starts_with(MARKER_OPEN) {
                        state = State::Inside {
                            marker_start: i,
                            key_start: i + MARKER_OPEN.len(),
                        };
                        i += MARKER_OPEN.len();
                    } else {
                        i += 1;
                    }
                }
                State::Inside {
                    marker_start,
                    key_start,
                } => {
                    if bytes[i] == b'\n' {
                        // keys never span lines; the opener was plain text
                        state = State::Outside;
                    } else if i > key_start && bytes[i..].starts_with(MARKER_CLOSE) {
                        pieces.push(Piece {
                            literal: &source[literal_start..marker_start],
                            marker: Some(Marker {
                                key: source[key_start..i].trim(),
                                offset: marker_start,
                            }),
                        });
                        i += MARKER_CLOSE.len();
                        literal_start = i;
                        state = State::Outside;
                    } else {
                        i += 1;
                    }
                }
            }
        }

        pieces.push(Piece {
            literal: &source[literal_start..],
            marker: None,
        });
        Self { pieces }
    }

    pub fn pieces(&self) -> &[Piece<'a>] {
        &self.pieces
    }

    /// Marker keys in template order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.pieces
            .iter()
            .filter_map(|piece| piece.marker.map(|m| m.key))
    }

    /// Substitute every marker, failing on the first key with no value
    pub fn render(&self, substitutions: &Substitutions) -> Result<String> {
        let mut out = String::new();
        for piece in &self.pieces {
            out.push_str(piece.literal);
            if let Some(marker) = piece.marker {
                let value = substitutions.get(marker.key).ok_or_else(|| {
                    Error::UnresolvedPlaceholder {
                        key: marker.key.to_string(),
                        offset: marker.offset,
                    }
                })?;
                out.push_str(&value.to_string());
            }
        }
        Ok(out)
    }
}

/// Parse and render `source` in one step
pub fn splice(source: &str, substitutions: &Substitutions) -> Result<String> {
    Template::parse(source).render(substitutions)
}

/// Values available to templates, keyed by marker key.
///
/// Values are rendered through their `Display` implementation, so generated
/// fragments and whole protocol enumerations can sit side by side.
#[derive(Default)]
pub struct Substitutions {
    values: BTreeMap<String, Box<dyn fmt::Display>>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display + 'static) {
        self.values.insert(key.into(), Box::new(value));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display + 'static) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&dyn fmt::Display> {
        self.values.get(key).map(|v| v.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for Substitutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Substitutions")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy() -> Substitutions {
        Substitutions::new().with("x", "1").with("y", "2")
    }

    #[test]
    fn test_no_markers_unchanged() {
        let source = "local r = {}\n-- a comment\n--[ not a marker ]\nreturn r\n";
        assert_eq!(splice(source, &Substitutions::new()).unwrap(), source);
        assert_eq!(splice("", &Substitutions::new()).unwrap(), "");
    }

    #[test]
    fn test_substitution_order() {
        assert_eq!(splice("A --[[x]] B --[[y]] C", &xy()).unwrap(), "A 1 B 2 C");
        assert_eq!(splice("--[[y]]--[[x]]--[[y]]", &xy()).unwrap(), "212");
    }

    #[test]
    fn test_whitespace_around_key() {
        assert_eq!(splice("A --[[ x ]] B", &xy()).unwrap(), "A 1 B");
    }

    #[test]
    fn test_missing_key_fails() {
        let err = splice("A --[[x]] B --[[z]] C", &xy()).unwrap_err();
        match err {
            Error::UnresolvedPlaceholder { key, offset } => {
                assert_eq!(key, "z");
                assert_eq!(offset, 12);
            }
            other => panic!("Expected unresolved placeholder, got: {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_marker_is_literal() {
        let source = "A --[[x\n]] B --[[y]]";
        assert_eq!(splice(source, &xy()).unwrap(), "A --[[x\n]] B 2");
        assert_eq!(splice("tail --[[x", &xy()).unwrap(), "tail --[[x");
    }

    #[test]
    fn test_empty_key_is_not_a_marker() {
        // `--[[]]` has no key; `]]]` closes with key `]`
        assert_eq!(splice("--[[]] ok", &xy()).unwrap(), "--[[]] ok");
        let subs = Substitutions::new().with("]", "bracket");
        assert_eq!(splice("--[[]]]", &subs).unwrap(), "bracket");
    }

    #[test]
    fn test_non_ascii_text_preserved() {
        let source = "-- héllo ✓ --[[x]] ünïcode";
        assert_eq!(splice(source, &xy()).unwrap(), "-- héllo ✓ 1 ünïcode");
    }

    #[test]
    fn test_display_values() {
        let subs = Substitutions::new().with("n", 42).with("s", String::from("str"));
        assert_eq!(splice("--[[n]]/--[[s]]", &subs).unwrap(), "42/str");
    }

    #[test]
    fn test_pieces_and_keys() {
        let template = Template::parse("A --[[x]] B --[[ y ]] C");
        let keys: Vec<&str> = template.keys().collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(template.pieces().len(), 3);
        assert_eq!(template.pieces()[2].literal, " C");
        assert!(template.pieces()[2].marker.is_none());
    }
}
