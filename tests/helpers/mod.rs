//! Shared fixtures for the integration tests: in-memory `SourceTransform`
//! doubles and temp-tree utilities.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use vecmat_codegen::{CodegenError, Result, RewriteRule, SourceTransform};

/// One recorded `apply` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub file_name: String,
    pub rules: Vec<String>,
    pub fix_imports: bool,
}

/// Stands in for the external toolchain: no formatting, rules applied with
/// `rewrite`, every call recorded. Fails on a chosen file name.
pub struct InMemoryTransform {
    rewrite: fn(&str, &RewriteRule) -> String,
    fail_on: Option<String>,
    pub calls: RefCell<Vec<Applied>>,
}

impl InMemoryTransform {
    /// Plain substring replacement, no notion of tokens.
    pub fn textual() -> Self {
        Self {
            rewrite: |text, rule| text.replace(&rule.pattern, &rule.replacement),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// The crate's token rewriter, as the real toolchain uses it.
    pub fn tokens() -> Self {
        Self {
            rewrite: |text, rule| rule.apply(text),
            ..Self::textual()
        }
    }

    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.fail_on = Some(file_name.to_string());
        self
    }

    pub fn file_names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.file_name.clone()).collect()
    }
}

impl SourceTransform for InMemoryTransform {
    fn apply(&self, path: &Path, rules: &[RewriteRule], fix_imports: bool) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push(Applied {
            file_name: file_name.clone(),
            rules: rules.iter().map(ToString::to_string).collect(),
            fix_imports,
        });

        if self.fail_on.as_deref() == Some(file_name.as_str()) {
            return Err(CodegenError::ToolFailed {
                command: format!("fmt {}", path.display()),
                output: "error: expected item, found `}`\n".to_string(),
            });
        }

        let mut text = fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for rule in rules {
            text = (self.rewrite)(&text, rule);
        }
        fs::write(path, text).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Writes `files` (relative path, content) under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Every file under `root`, keyed by relative path.
pub fn read_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

/// The sample `f32` tree shipped in `demos/vecmat32`.
pub fn demo_tree() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/vecmat32")
}
