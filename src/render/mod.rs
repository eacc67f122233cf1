//! Template rendering for generated vector/matrix sources.
//!
//! Templates are handlebars with the helpers from [`helpers`] registered.
//! HTML escaping is off (the output is Rust) and strict mode is on, so an
//! unknown variable or helper fails the render instead of emitting nothing.
//!
//! ```text
//! {{#each (enum 2 3 4) as |n|}}
//! pub struct {{typename 1 n}}(pub [f32; {{n}}]);
//! {{/each}}
//! ```

mod helpers;

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::info;

pub use helpers::helper_names;

use crate::config::GENERATED_BY_COMMENT;
use crate::error::{CodegenError, Result};
use crate::transform::SourceTransform;

/// Data visible to a template as `{{comment}}` and `{{template_name}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationContext {
    pub comment: String,
    pub template_name: String,
}

impl GenerationContext {
    pub fn new(template_name: impl Into<String>) -> Self {
        Self {
            comment: GENERATED_BY_COMMENT.to_string(),
            template_name: template_name.into(),
        }
    }
}

pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        helpers::register(&mut registry);
        Self { registry }
    }

    /// Renders `source` as template `name`. Nothing is returned unless the
    /// whole template expanded.
    pub fn render_str(
        &mut self,
        name: &str,
        source: &str,
        context: &GenerationContext,
    ) -> Result<String> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| CodegenError::TemplateParse {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let rendered = self
            .registry
            .render(name, context)
            .map_err(|e| CodegenError::TemplateRender {
                name: name.to_string(),
                message: e.to_string(),
            });
        self.registry.unregister_template(name);
        rendered
    }

    /// Renders the template at `template_path` into `output_path`, then hands
    /// the output to the formatter.
    ///
    /// The output file is only created once rendering succeeded.
    pub fn render_file(
        &mut self,
        template_path: &Path,
        output_path: &Path,
        transform: &dyn SourceTransform,
    ) -> Result<()> {
        let name = template_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| template_path.display().to_string());
        let source = std::fs::read_to_string(template_path)
            .map_err(|e| CodegenError::io(template_path, e))?;

        let context = GenerationContext::new(&name);
        let rendered = self.render_str(&name, &source, &context)?;

        std::fs::write(output_path, rendered).map_err(|e| CodegenError::io(output_path, e))?;
        transform.apply(output_path, &[], false)?;

        info!(
            template = %template_path.display(),
            output = %output_path.display(),
            "generated"
        );
        Ok(())
    }
}
