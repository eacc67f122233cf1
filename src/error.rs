//! Error types for template rendering and tree derivation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

/// Everything that can abort a render or a derivation run.
///
/// None of these are recoverable: the caller reports and exits.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Template source failed to parse.
    #[error("template {name} failed to parse: {message}")]
    TemplateParse { name: String, message: String },

    /// Template execution failed (unknown helper, bad parameter, helper contract violation).
    #[error("template {name} failed to render: {message}")]
    TemplateRender { name: String, message: String },

    /// A generated type needs at least one row and one column.
    #[error("invalid dimension {rows}x{cols}: rows and columns must be >= 1")]
    InvalidDimension { rows: i64, cols: i64 },

    /// Only X, Y, Z and W exist.
    #[error("can't generate element name for axis {0}: dimensions above 4 are not supported")]
    AxisOutOfRange(i64),

    #[error("{helper}: count must not be negative, got {count}")]
    NegativeCount { helper: &'static str, count: i64 },

    /// Template arithmetic left the integer range.
    #[error("{helper}: integer overflow")]
    Overflow { helper: &'static str },

    #[error("invalid rewrite rule {0:?}: expected \"pattern -> replacement\"")]
    InvalidRule(String),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("empty command line {0:?}")]
    EmptyCommand(String),

    /// External tool exited non-zero. `output` is stdout followed by stderr, verbatim.
    #[error("error executing `{command}`:\n{output}")]
    ToolFailed { command: String, output: String },

    #[error("failed to run `{command}`: {source}")]
    ToolSpawn {
        command: String,
        #[source]
        source: xshell::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("destination {} is the source tree itself", .0.display())]
    DestinationIsSource(PathBuf),

    /// A single file failed part-way through a derivation run.
    #[error("deriving {}: {source}", path.display())]
    Derivation {
        path: PathBuf,
        #[source]
        source: Box<CodegenError>,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The source file a derivation failure is attributed to, if any.
    pub fn failed_path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Derivation { path, .. } => Some(path),
            _ => None,
        }
    }

    /// True for template-side failures (parse, render, helper contract).
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateParse { .. }
                | Self::TemplateRender { .. }
                | Self::InvalidDimension { .. }
                | Self::AxisOutOfRange(_)
                | Self::NegativeCount { .. }
                | Self::Overflow { .. }
        )
    }
}
