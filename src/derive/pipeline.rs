//! Per-file rewrite: provenance, directive suppression, write, transform.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{DeriveConfig, GENERATE_DIRECTIVE, INERT_GENERATE_DIRECTIVE};
use crate::error::{CodegenError, Result};
use crate::rewrite::RewriteRule;
use crate::transform::SourceTransform;

/// One eligible file found by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationTarget {
    /// Path of the file to read.
    pub source: PathBuf,
    /// Mirrored path in the destination tree.
    pub dest: PathBuf,
    /// Source path relative to the walk root, `/`-separated.
    pub relative: String,
}

/// Provenance header plus content with every generate directive made inert.
pub fn prepare_source(config: &DeriveConfig, relative: &str, content: &str) -> String {
    let mut out = config.provenance_comment(relative);
    out.push_str(&content.replace(GENERATE_DIRECTIVE, INERT_GENERATE_DIRECTIVE));
    out
}

/// Runs every step for one file. The destination is written before the
/// transform runs, so a transform failure leaves it on disk. Once the
/// transform succeeded the destination takes the source's permissions.
pub fn derive_file(
    config: &DeriveConfig,
    target: &DerivationTarget,
    rules: &[RewriteRule],
    transform: &dyn SourceTransform,
) -> Result<()> {
    debug!(source = %target.source.display(), dest = %target.dest.display(), "deriving");

    let content = std::fs::read_to_string(&target.source)
        .map_err(|e| CodegenError::io(&target.source, e))?;
    let prepared = prepare_source(config, &target.relative, &content);
    write_truncating(&target.dest, &prepared)?;

    transform.apply(&target.dest, rules, true)?;
    copy_permissions(&target.source, &target.dest)
}

/// Gives `dest` the permission bits of `source`.
pub(crate) fn copy_permissions(source: &Path, dest: &Path) -> Result<()> {
    let permissions = std::fs::metadata(source)
        .map_err(|e| CodegenError::io(source, e))?
        .permissions();
    std::fs::set_permissions(dest, permissions).map_err(|e| CodegenError::io(dest, e))
}

fn write_truncating(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| CodegenError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_then_content() {
        let out = prepare_source(&DeriveConfig::default(), "vector.rs", "pub struct Vec2;\n");
        assert_eq!(
            out,
            "// This file is generated from vecmat32/vector.rs; DO NOT EDIT\n\npub struct Vec2;\n"
        );
    }

    #[test]
    fn directives_made_inert() {
        let content = "//vecmat:generate vecmat-codegen --template vector.rs.hbs --output vector.rs\n\
                       //vecmat:generate vecmat-codegen --vecmat64\n\
                       pub mod vector;\n";
        let out = prepare_source(&DeriveConfig::default(), "lib.rs", content);
        assert!(!out.lines().any(|l| l.starts_with(GENERATE_DIRECTIVE)));
        assert_eq!(out.matches(INERT_GENERATE_DIRECTIVE).count(), 2);
        assert!(out.ends_with("pub mod vector;\n"));
    }

    #[test]
    fn already_inert_untouched() {
        let content = "//#vecmat:generate vecmat-codegen --vecmat64\n";
        let out = prepare_source(&DeriveConfig::default(), "lib.rs", content);
        assert!(out.ends_with(content));
    }
}
