//! Lua driver code generation.
//!
//! Generation runs in two steps:
//!
//! 1. **Plan** (`plan`): every catalog term is paired with its method name
//!    (`naming.rs`) and wrapper strategy (`arity.rs`)
//! 2. **Emit** (`fragments.rs`): the plan is rendered into the three Lua
//!    fragments the driver template splices in
//!
//! # Example
//!
//! ```rust,ignore
//! let tables = CodegenTables::default();
//! let fragments = Fragments::generate(&catalog, &tables)?;
//! println!("{}", fragments.ast_methods);
//! ```

pub mod arity;
pub mod fragments;
pub mod naming;

pub use arity::{ArityTable, WrapperStrategy};
pub use naming::NameResolver;

use crate::error::Result;
use crate::reql::{Term, TermCatalog};
use tracing::{debug, warn};

/// Template key of the class declarations fragment
pub const AST_CLASSES: &str = "AstClasses";
/// Template key of the method table fragment
pub const AST_METHODS: &str = "AstMethods";
/// Template key of the forward declarations fragment
pub const AST_NAMES: &str = "AstNames";

pub const DEFAULT_WRAP_WIDTH: usize = 77;

/// Lookup tables shared by all generators, built once per run
#[derive(Debug, Clone)]
pub struct CodegenTables {
    pub names: NameResolver,
    pub arity: ArityTable,
    pub wrap_width: usize,
}

impl CodegenTables {
    pub fn new(names: NameResolver, arity: ArityTable) -> Self {
        Self {
            names,
            arity,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }
}

impl Default for CodegenTables {
    fn default() -> Self {
        Self::new(NameResolver::default(), ArityTable::reql())
    }
}

/// A catalog term with everything needed to emit its code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermPlan<'a> {
    pub term: &'a Term,
    pub method: String,
    pub strategy: WrapperStrategy,
}

/// Pair every catalog term with its method name and wrapper strategy
pub fn plan<'a>(catalog: &'a TermCatalog, tables: &CodegenTables) -> Result<Vec<TermPlan<'a>>> {
    let names = tables.names.resolve(catalog)?;

    for identifier in tables.arity.dual_listed() {
        if catalog.get(identifier).is_some() {
            debug!(term = identifier, "Options-tail and fixed-arity listed; using fixed-arity");
        }
    }

    Ok(catalog
        .terms()
        .iter()
        .zip(names)
        .map(|(term, method)| TermPlan {
            term,
            strategy: tables.arity.strategy(&term.identifier),
            method,
        })
        .collect())
}

/// The three generated Lua fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    pub ast_classes: String,
    pub ast_methods: String,
    pub ast_names: String,
}

impl Fragments {
    pub fn generate(catalog: &TermCatalog, tables: &CodegenTables) -> Result<Self> {
        if catalog.is_empty() {
            warn!("Term catalog is empty; generated fragments will be blank");
        }

        let plans = plan(catalog, tables)?;
        let fragments = Self {
            ast_classes: fragments::ast_classes(&plans),
            ast_methods: fragments::ast_methods(&plans),
            ast_names: fragments::ast_names(catalog.identifiers(), tables.wrap_width),
        };

        debug!(
            terms = plans.len(),
            classes_bytes = fragments.ast_classes.len(),
            methods_bytes = fragments.ast_methods.len(),
            names_bytes = fragments.ast_names.len(),
            "Generated fragments"
        );
        Ok(fragments)
    }
}
