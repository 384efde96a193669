//! Email template engine.
//!
//! This module provides:
//! - A parser for `{{name}}`, `{{#if name}}…{{/if}}` and `{{#each name}}…{{/each}}`
//! - A tree-walking renderer over a JSON variable bag
//! - The built-in template catalog
//!
//! # Example
//!
//! ```ignore
//! let catalog = TemplateCatalog::builtin();
//! let template = catalog.find_for(UpdateKind::Milestone).unwrap();
//!
//! let variables = json!({
//!     "title": "Research Foundation Complete",
//!     "achievements": ["Team of 7 AI experts assembled"]
//! });
//!
//! let email = process_template(template, variables.as_object().unwrap());
//! ```

mod catalog;
mod parser;
mod render;
mod types;

pub use catalog::TemplateCatalog;
pub use parser::{parse, Node};
pub use render::{is_truthy, process_template, render, render_str, stringify};
pub use types::{RenderedEmail, Template, TemplateKind, TemplateSummary};
