//! ReQL protocol definition and term catalog.
//!
//! This module holds the two inputs every generator pass starts from:
//!
//! - **Protocol definition** (`protodef.rs`): the `Query`, `Response` and
//!   `Term` enumerations as read from the JSON protocol definition
//! - **Term catalog** (`terms.rs`): the sorted list of terms that receive
//!   generated code
//!
//! # Example
//!
//! ```rust,ignore
//! use reql_codegen::reql::{ProtocolDef, TermCatalog};
//!
//! let protodef = ProtocolDef::load("proto/reql_protodef.json")?;
//! let catalog = TermCatalog::from_protodef(&protodef)?;
//! assert_eq!(catalog.terms()[0].identifier, "ADD");
//! ```

pub mod protodef;
pub mod terms;

pub use protodef::{ProtoEnum, ProtocolDef};
pub use terms::{Term, TermCatalog, RESERVED_TERMS};
