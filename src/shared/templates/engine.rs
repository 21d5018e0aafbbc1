//! HTML template rendering using Jinja2 syntax.
//!
//! Templates live in `templates/` at the project root and are embedded into
//! the binary at compile time, so the service does not depend on its working
//! directory at runtime.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use thiserror::Error;

/// Embedded templates, keyed by their path relative to `templates/`
const TEMPLATES: &[(&str, &str)] = &[(
    "form/index.html.jinja",
    include_str!("../../../templates/form/index.html.jinja"),
)];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Owns the template environment; built once at startup
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        // Everything rendered here is HTML, whatever the file suffix
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| TemplateError::RenderError(e.to_string()))?;
            tracing::debug!("Loaded template: {}", name);
        }

        Ok(Self { env })
    }

    /// Render a template with the given context.
    pub fn render<C: Serialize>(&self, template_name: &str, ctx: C) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}
