//! Projdoc is the document template catalogue behind project documents.
//!
//! It provides:
//! - A compiled-in registry of sixteen document templates grouped into
//!   core, lifecycle and AI-specific categories
//! - Default content for every template, handed out as independent copies
//! - Typed content shapes (one struct per template type) for validating
//!   document payloads
//!
//! ```rust
//! use projdoc::{TemplateType, templates};
//!
//! let content = templates::get_default_content(TemplateType::ProjectPlan);
//! assert!(content.is_object());
//! ```

pub mod content;
pub mod error;
pub mod template;
pub mod templates;

pub use content::DocumentContent;
pub use error::{Result, TemplateError};
pub use template::{CategoryInfo, DocumentCategory, DocumentTemplate, TemplateInfo, TemplateType};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
