// reql-codegen - Lua ReQL driver generator
// Builds the AST module of the Lua driver from the ReQL protocol definition

#![warn(rust_2018_idioms)]

pub mod codegen;
pub mod config;
pub mod driver;
pub mod reql;
pub mod template;

// Re-exports for convenience
pub use codegen::{CodegenTables, Fragments};
pub use config::GeneratorConfig;
pub use driver::Driver;
pub use reql::{ProtocolDef, TermCatalog};
pub use template::{Substitutions, Template};

/// Generator error types
pub mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Protocol definition error: {0}")]
        Protodef(String),

        #[error("Duplicate term tag {tag}: {first} and {second}")]
        DuplicateTag {
            tag: i64,
            first: String,
            second: String,
        },

        #[error("Method name '{name}' generated for both {first} and {second}")]
        NameCollision {
            name: String,
            first: String,
            second: String,
        },

        #[error("Unresolved placeholder '{key}' at byte {offset}")]
        UnresolvedPlaceholder { key: String, offset: usize },

        #[error("I/O error on {}: {source}", .path.display())]
        Io {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },

        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl Error {
        pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
            Error::Io {
                path: path.into(),
                source,
            }
        }
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
