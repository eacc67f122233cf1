//! Derivation of the `f64` tree from the `f32` tree.
//!
//! The walk is depth-first, pre-order, with directory entries visited in
//! file-name order so two runs over the same tree do the same work in the same
//! order. Directories are mirrored; eligible files go through
//! [`pipeline::derive_file`]; the first failure aborts the run and nothing
//! already written is rolled back.

mod pipeline;

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

pub use pipeline::{derive_file, prepare_source, DerivationTarget};

use pipeline::copy_permissions;

use crate::config::DeriveConfig;
use crate::error::{CodegenError, Result};
use crate::rewrite::{f64_rewrite_rules, RewriteRule};
use crate::transform::SourceTransform;

/// What a successful run did, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationReport {
    /// Relative paths of mirrored directories, the root included as `""`.
    pub dirs: Vec<PathBuf>,
    /// Relative paths of derived files.
    pub files: Vec<PathBuf>,
    /// Relative paths of entries skipped for not being regular files.
    pub skipped: Vec<PathBuf>,
}

pub struct Deriver<'a> {
    config: DeriveConfig,
    rules: Vec<RewriteRule>,
    transform: &'a dyn SourceTransform,
}

struct Walk<'p> {
    dest_root: &'p Path,
    /// Canonical destination root when it lies inside the source tree.
    excluded: Option<PathBuf>,
    report: DerivationReport,
}

impl<'a> Deriver<'a> {
    /// A deriver applying the fixed `f32 -> f64` rule list.
    pub fn new(config: DeriveConfig, transform: &'a dyn SourceTransform) -> Self {
        Self {
            config,
            rules: f64_rewrite_rules(),
            transform,
        }
    }

    /// Replaces the rule list. Rules still run strictly in the given order.
    pub fn with_rules(mut self, rules: Vec<RewriteRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Mirrors `source_root` into `dest_root`, deriving every eligible file.
    pub fn run(&self, source_root: &Path, dest_root: &Path) -> Result<DerivationReport> {
        fs::create_dir_all(dest_root).map_err(|e| CodegenError::io(dest_root, e))?;

        let source_canon =
            fs::canonicalize(source_root).map_err(|e| CodegenError::io(source_root, e))?;
        let dest_canon = fs::canonicalize(dest_root).map_err(|e| CodegenError::io(dest_root, e))?;
        if source_canon == dest_canon {
            return Err(CodegenError::DestinationIsSource(dest_root.to_path_buf()));
        }

        let mut walk = Walk {
            dest_root,
            excluded: dest_canon.starts_with(&source_canon).then_some(dest_canon),
            report: DerivationReport::default(),
        };
        self.visit_dir(source_root, Path::new(""), &mut walk)?;

        info!(
            files = walk.report.files.len(),
            dirs = walk.report.dirs.len(),
            skipped = walk.report.skipped.len(),
            dest = %dest_root.display(),
            "derivation complete"
        );
        Ok(walk.report)
    }

    fn visit_dir(&self, source_dir: &Path, relative: &Path, walk: &mut Walk<'_>) -> Result<()> {
        let dest_dir = walk.dest_root.join(relative);
        let created = !dest_dir.exists();
        fs::create_dir_all(&dest_dir).map_err(|e| CodegenError::io(&dest_dir, e))?;
        walk.report.dirs.push(relative.to_path_buf());

        let mut entries = fs::read_dir(source_dir)
            .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
            .map_err(|e| CodegenError::io(source_dir, e))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name();
            let rel = relative.join(&name);
            // DirEntry::file_type does not follow symlinks.
            let file_type = entry
                .file_type()
                .map_err(|e| CodegenError::io(&path, e))?;

            if file_type.is_dir() {
                if self.is_excluded(&path, walk) {
                    debug!(path = %rel.display(), "skipping destination tree");
                    continue;
                }
                self.visit_dir(&path, &rel, walk)?;
            } else if !file_type.is_file() {
                warn!(path = %rel.display(), "Ignored, not a regular file");
                walk.report.skipped.push(rel);
            } else if self.is_eligible(&name) {
                let target = DerivationTarget {
                    source: path,
                    dest: walk.dest_root.join(&rel),
                    relative: slash_path(&rel),
                };
                derive_file(&self.config, &target, &self.rules, self.transform).map_err(
                    |source| CodegenError::Derivation {
                        path: rel.clone(),
                        source: Box::new(source),
                    },
                )?;
                walk.report.files.push(rel);
            }
        }

        // Applied last so a read-only source directory does not block its children.
        if created {
            copy_permissions(source_dir, &dest_dir)?;
        }
        Ok(())
    }

    fn is_eligible(&self, name: &OsStr) -> bool {
        let path = Path::new(name);
        path.extension() == Some(OsStr::new(&self.config.extension))
            && name != OsStr::new(&self.config.generator_file)
    }

    fn is_excluded(&self, dir: &Path, walk: &Walk<'_>) -> bool {
        match &walk.excluded {
            Some(excluded) => fs::canonicalize(dir).is_ok_and(|canon| &canon == excluded),
            None => false,
        }
    }
}

/// `sub/vector.rs` on every platform.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
