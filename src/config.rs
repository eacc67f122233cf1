//! Generator configuration.
//!
//! Defaults are usable as-is; a YAML file can override any part of them and
//! the CLI overrides tool programs on top of that.
//!
//! ```yaml
//! tools:
//!   formatter:
//!     program: rustfmt
//!     args: ["--edition", "2021"]
//! derive:
//!   source_label: vecmat32
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CodegenError, Result};

/// Comment heading every file produced by template mode.
pub const GENERATED_BY_COMMENT: &str = "This file is generated by vecmat-codegen; DO NOT EDIT";

/// Marker that makes a source file a generation entry point.
pub const GENERATE_DIRECTIVE: &str = "//vecmat:generate ";

/// What [`GENERATE_DIRECTIVE`] becomes in derived files.
pub const INERT_GENERATE_DIRECTIVE: &str = "//#vecmat:generate ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub tools: ToolConfig,
    pub derive: DeriveConfig,
}

impl CodegenConfig {
    /// Loads a YAML config file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading codegen configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Self::from_yaml(&content).map_err(|source| CodegenError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// External programs used after rendering and during derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub formatter: CommandSpec,
    pub import_fixer: CommandSpec,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            formatter: CommandSpec::new("rustfmt", ["--edition", "2021"]),
            import_fixer: CommandSpec::new(
                "rustfmt",
                ["--edition", "2021", "--config", "reorder_imports=true"],
            ),
        }
    }
}

/// A program plus leading arguments; the target file is appended last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a whitespace-separated command line such as `rustfmt --edition 2021`.
    /// No shell quoting.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| CodegenError::EmptyCommand(line.to_string()))?;
        Ok(Self::new(program, words))
    }

    /// Command line as it will run against `path`, for diagnostics.
    pub fn command_line(&self, path: &Path) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.push(path.display().to_string());
        parts.join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Derivation settings. The rewrite rules themselves are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    /// Name of the source tree, recorded in provenance comments.
    pub source_label: String,
    /// Extension of eligible files, without the dot.
    pub extension: String,
    /// The generator's own file, never derived.
    pub generator_file: String,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            source_label: "vecmat32".to_string(),
            extension: "rs".to_string(),
            generator_file: "codegen.rs".to_string(),
        }
    }
}

impl DeriveConfig {
    /// `// This file is generated from vecmat32/<relative>; DO NOT EDIT` plus a blank line.
    pub fn provenance_comment(&self, relative: &str) -> String {
        format!(
            "// This file is generated from {}/{}; DO NOT EDIT\n\n",
            self.source_label, relative
        )
    }
}
