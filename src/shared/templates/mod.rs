//! HTML page templates.
//!
//! Pages are Jinja templates under `templates/pages/`, embedded at compile
//! time and rendered with auto-escaping.

pub mod engine;

pub use engine::render_page;
