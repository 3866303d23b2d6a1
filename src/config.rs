//! Generator configuration.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults (`config/default.toml`)
//! 2. `reql-codegen.toml` in the working directory, if present
//! 3. the file passed with `--config`, if any

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Optional per-checkout configuration file
pub const LOCAL_CONFIG: &str = "reql-codegen.toml";

/// Suffix of template files
pub const TEMPLATE_SUFFIX: &str = ".pre.lua";
/// Suffix of generated files
pub const OUTPUT_SUFFIX: &str = ".lua";

/// Narrowest wrap width that fits `local X`
const MIN_WRAP_WIDTH: usize = "local X".len() + 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// JSON protocol definition
    pub protodef: PathBuf,
    /// Directory holding the templates
    pub src_dir: PathBuf,
    /// Template names, without suffix
    pub templates: Vec<String>,
    /// Forward declaration wrap width
    pub wrap_width: usize,
}

impl GeneratorConfig {
    /// Load the layered configuration
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(Path::new(LOCAL_CONFIG)).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path));
        }

        let config: GeneratorConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration layered over the defaults from TOML text
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: GeneratorConfig = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(Error::Config("no templates configured".to_string()));
        }
        if let Some(name) = self
            .templates
            .iter()
            .find(|name| name.is_empty() || name.contains(['/', '\\']))
        {
            return Err(Error::Config(format!("invalid template name '{}'", name)));
        }
        if self.wrap_width < MIN_WRAP_WIDTH {
            return Err(Error::Config(format!(
                "wrap_width must be at least {}, got {}",
                MIN_WRAP_WIDTH, self.wrap_width
            )));
        }
        Ok(())
    }

    /// `<src_dir>/<name>.pre.lua`
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.src_dir.join(format!("{}{}", name, TEMPLATE_SUFFIX))
    }

    /// `<src_dir>/<name>.lua`
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.src_dir.join(format!("{}{}", name, OUTPUT_SUFFIX))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            protodef: PathBuf::from("proto/reql_protodef.json"),
            src_dir: PathBuf::from("lua"),
            templates: vec!["rethinkdb".to_string()],
            wrap_width: crate::codegen::DEFAULT_WRAP_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_embedded_file() {
        let config = GeneratorConfig::from_toml("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_override() {
        let config = GeneratorConfig::from_toml(
            "src_dir = \"driver/src\"\ntemplates = [\"rethinkdb\", \"extras\"]\nwrap_width = 100\n",
        )
        .unwrap();
        assert_eq!(config.src_dir, PathBuf::from("driver/src"));
        assert_eq!(config.templates, vec!["rethinkdb", "extras"]);
        assert_eq!(config.wrap_width, 100);
        assert_eq!(config.protodef, PathBuf::from("proto/reql_protodef.json"));
    }

    #[test]
    fn test_paths() {
        let config = GeneratorConfig::default();
        assert_eq!(
            config.template_path("rethinkdb"),
            PathBuf::from("lua").join("rethinkdb.pre.lua")
        );
        assert_eq!(
            config.output_path("rethinkdb"),
            PathBuf::from("lua").join("rethinkdb.lua")
        );
    }

    #[test]
    fn test_invalid_settings() {
        let empty = GeneratorConfig {
            templates: Vec::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(empty.validate(), Err(Error::Config(_))));
        assert!(matches!(
            GeneratorConfig::from_toml("templates = [\"../escape\"]"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml("wrap_width = 3"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_toml("wrap_width = \"wide\""),
            Err(Error::Config(_))
        ));
    }
}
