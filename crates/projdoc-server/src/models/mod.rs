//! API models for requests and responses

pub mod api;
pub mod document;
pub mod project;
pub mod template;

// Re-export commonly used types
pub use api::*;
pub use document::*;
pub use project::*;
pub use template::*;
