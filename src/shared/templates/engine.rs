use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static PAGE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Embedded page templates, keyed by the name used in `render_page`
const PAGES: &[(&str, &str)] = &[(
    "index.html",
    include_str!("../../../templates/pages/index.html"),
)];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in PAGES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    PAGE_ENV.get_or_init(init_environment)
}

/// Render a page with any serializable context.
///
/// Names ending in `.html` are auto-escaped.
pub fn render_page<S: Serialize>(template_name: &str, ctx: &S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
