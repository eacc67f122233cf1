//! Code generator for fixed-size vector and matrix types.
//!
//! Two independent flows:
//!
//! ```text
//! template.rs.hbs ──► TemplateRenderer ──► output.rs ──► formatter
//!
//! vecmat32/ ──► Deriver (walk) ──► per file: provenance + inert directives
//!                                   ──► formatter ──► rewrite rules (in order)
//!                                   ──► import fixer ──► vecmat64/
//! ```
//!
//! # Key Concepts
//!
//! - **Template helpers**: naming (`typename`, `elementname`), indexing
//!   (`iter`, `matiter`) and repetition (`repeat`, `sep`, `add`, `mul`, `enum`)
//!   exposed to handlebars templates
//! - **Column-major cells**: `index = col * rows + row`, the storage layout of
//!   every generated matrix
//! - **Rewrite rules**: ordered `pattern -> replacement` token substitutions
//!   turning the `f32` tree into the `f64` tree
//! - **SourceTransform**: the port behind which formatting, rule application and
//!   import normalization happen

pub mod config;
pub mod derive;
mod error;
pub mod indexing;
pub mod naming;
pub mod render;
pub mod repeat;
pub mod rewrite;
pub mod transform;

pub use config::{
    CodegenConfig, CommandSpec, DeriveConfig, ToolConfig, GENERATED_BY_COMMENT,
    GENERATE_DIRECTIVE, INERT_GENERATE_DIRECTIVE,
};
pub use derive::{DerivationReport, DerivationTarget, Deriver};
pub use error::{CodegenError, Result};
pub use indexing::MatrixCell;
pub use render::{GenerationContext, TemplateRenderer};
pub use rewrite::{f64_rewrite_rules, RewriteRule};
pub use transform::{SourceTransform, Toolchain};
