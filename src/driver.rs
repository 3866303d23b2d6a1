//! Build driver: load → generate → splice → write.
//!
//! The substitution map is built once from the protocol definition and
//! shared by every configured template.

use crate::codegen::{CodegenTables, Fragments, AST_CLASSES, AST_METHODS, AST_NAMES};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::reql::{ProtocolDef, TermCatalog};
use crate::template::{Substitutions, Template};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Template key of the query type enumeration
pub const QUERY: &str = "Query";
/// Template key of the response type enumeration
pub const RESPONSE: &str = "Response";
/// Template key of the term type enumeration
pub const TERM: &str = "Term";

/// Everything a template may reference
pub fn substitutions(protodef: &ProtocolDef, fragments: Fragments) -> Substitutions {
    Substitutions::new()
        .with(AST_CLASSES, fragments.ast_classes)
        .with(AST_METHODS, fragments.ast_methods)
        .with(AST_NAMES, fragments.ast_names)
        .with(QUERY, protodef.query_types().clone())
        .with(RESPONSE, protodef.response_types().clone())
        .with(TERM, protodef.term_types().clone())
}

/// Write `contents` to a sibling temporary file, then move it over `path`,
/// so a failed run never leaves a truncated output behind.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }
    Ok(())
}

pub struct Driver {
    config: GeneratorConfig,
    substitutions: Substitutions,
}

impl Driver {
    /// Load the protocol definition and generate all fragments
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let protodef = ProtocolDef::load(&config.protodef)?;
        info!(path = %config.protodef.display(), "Loaded protocol definition");

        let tables = CodegenTables::default().with_wrap_width(config.wrap_width);
        Self::with_tables(config, &protodef, &tables)
    }

    /// Build a driver from an already parsed protocol definition
    pub fn with_tables(
        config: GeneratorConfig,
        protodef: &ProtocolDef,
        tables: &CodegenTables,
    ) -> Result<Self> {
        let catalog = TermCatalog::from_protodef(protodef)?;
        let fragments = Fragments::generate(&catalog, tables)?;
        info!(terms = catalog.len(), "Generated AST fragments");

        Ok(Self {
            config,
            substitutions: substitutions(protodef, fragments),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    /// Render one template in memory
    pub fn render(&self, name: &str) -> Result<String> {
        let path = self.config.template_path(name);
        let source = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let template = Template::parse(&source);
        debug!(
            template = name,
            markers = template.keys().count(),
            "Parsed template"
        );
        template.render(&self.substitutions)
    }

    /// Render one template and write it next to the template
    #[instrument(skip(self))]
    pub fn process(&self, name: &str) -> Result<PathBuf> {
        let output = self.render(name)?;
        let path = self.config.output_path(name);
        write_atomically(&path, &output)?;
        info!(path = %path.display(), bytes = output.len(), "Wrote generated source");
        Ok(path)
    }

    /// Process every configured template, stopping at the first failure
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        self.config
            .templates
            .iter()
            .map(|name| self.process(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "reql_codegen_driver_{}_{}",
            label,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_atomically_replaces() {
        let dir = scratch_dir("atomic");
        let path = dir.join("out.lua");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.join("out.lua.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_atomically_missing_dir() {
        let dir = scratch_dir("missing");
        let path = dir.join("absent").join("out.lua");
        assert!(matches!(
            write_atomically(&path, "x"),
            Err(Error::Io { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_substitution_keys() {
        let protodef = ProtocolDef::from_json(
            r#"{"Query": {"QueryType": {"START": 1}},
                "Response": {"ResponseType": {"SUCCESS_ATOM": 1}},
                "Term": {"TermType": {"DATUM": 1, "DB": 14}}}"#,
        )
        .unwrap();
        let catalog = TermCatalog::from_protodef(&protodef).unwrap();
        let fragments = Fragments::generate(&catalog, &CodegenTables::default()).unwrap();
        let subs = substitutions(&protodef, fragments);

        let keys: Vec<&str> = subs.keys().collect();
        assert_eq!(
            keys,
            vec!["AstClasses", "AstMethods", "AstNames", "Query", "Response", "Term"]
        );
        assert_eq!(subs.get("AstNames").unwrap().to_string(), "local DB");
        assert_eq!(
            subs.get("Term").unwrap().to_string(),
            "{\n  DATUM = 1,\n  DB = 14,\n}"
        );
    }
}
