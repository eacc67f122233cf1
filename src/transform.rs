//! The "apply source transform" port and its production implementation.
//!
//! Rendering and derivation only ever talk to [`SourceTransform`], so tests can
//! swap the external toolchain for an in-memory double.

use std::path::Path;

use tracing::{debug, error};
use xshell::Shell;

use crate::config::{CommandSpec, ToolConfig};
use crate::error::{CodegenError, Result};
use crate::rewrite::RewriteRule;

/// Formats a file in place, applies `rules` in order, then optionally
/// normalizes imports. Every step blocks until done; the first failure stops
/// the rest.
pub trait SourceTransform {
    fn apply(&self, path: &Path, rules: &[RewriteRule], fix_imports: bool) -> Result<()>;
}

/// `rustfmt` (or whatever is configured) plus the token rewriter.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    tools: ToolConfig,
}

impl Toolchain {
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }

    fn run(&self, spec: &CommandSpec, path: &Path) -> Result<()> {
        let command = spec.command_line(path);
        debug!(%command, "running external tool");

        let sh = Shell::new().map_err(|source| CodegenError::ToolSpawn {
            command: command.clone(),
            source,
        })?;
        let output = sh
            .cmd(&spec.program)
            .args(&spec.args)
            .arg(path)
            .quiet()
            .ignore_status()
            .output()
            .map_err(|source| CodegenError::ToolSpawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            error!(%command, status = %output.status, "external tool failed");
            return Err(CodegenError::ToolFailed {
                command,
                output: combined,
            });
        }
        Ok(())
    }
}

impl SourceTransform for Toolchain {
    fn apply(&self, path: &Path, rules: &[RewriteRule], fix_imports: bool) -> Result<()> {
        self.run(&self.tools.formatter, path)?;

        for rule in rules {
            rewrite_file(path, rule)?;
        }

        if fix_imports {
            self.run(&self.tools.import_fixer, path)?;
        }
        Ok(())
    }
}

/// One rewrite pass over a file on disk.
pub fn rewrite_file(path: &Path, rule: &RewriteRule) -> Result<()> {
    debug!(path = %path.display(), %rule, "applying rewrite rule");
    let source = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
    let rewritten = rule.apply(&source);
    if rewritten != source {
        std::fs::write(path, rewritten).map_err(|e| CodegenError::io(path, e))?;
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn toolchain(formatter: CommandSpec, import_fixer: CommandSpec) -> Toolchain {
        Toolchain::new(ToolConfig {
            formatter,
            import_fixer,
        })
    }

    #[test]
    fn rules_run_after_formatter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vec.rs");
        std::fs::write(&path, "pub type Scalar = f32;\n").unwrap();

        let tools = toolchain(
            CommandSpec::new("true", Vec::<String>::new()),
            CommandSpec::new("true", Vec::<String>::new()),
        );
        tools
            .apply(&path, &[RewriteRule::new("f32", "f64")], true)
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "pub type Scalar = f64;\n"
        );
    }

    #[test]
    fn formatter_failure_surfaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vec.rs");
        std::fs::write(&path, "pub type Scalar = f32;\n").unwrap();

        let tools = toolchain(
            CommandSpec::new("sh", ["-c", "echo 'expected item' >&2; exit 1", "fmt"]),
            CommandSpec::new("true", Vec::<String>::new()),
        );
        let err = tools
            .apply(&path, &[RewriteRule::new("f32", "f64")], false)
            .unwrap_err();

        match err {
            CodegenError::ToolFailed { command, output } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(output, "expected item\n");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Rules never ran.
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "pub type Scalar = f32;\n"
        );
    }

    #[test]
    fn import_fixer_only_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vec.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let tools = toolchain(
            CommandSpec::new("true", Vec::<String>::new()),
            CommandSpec::new("false", Vec::<String>::new()),
        );
        assert!(tools.apply(&path, &[], false).is_ok());
        assert!(matches!(
            tools.apply(&path, &[], true),
            Err(CodegenError::ToolFailed { .. })
        ));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vec.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let tools = toolchain(
            CommandSpec::new("vecmat-no-such-formatter", Vec::<String>::new()),
            CommandSpec::new("true", Vec::<String>::new()),
        );
        assert!(matches!(
            tools.apply(&path, &[], false),
            Err(CodegenError::ToolSpawn { .. })
        ));
    }
}
