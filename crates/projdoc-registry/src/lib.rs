//! # Projdoc Registry
//!
//! Versioned, access-controlled project documents:
//! - Documents are created from the `projdoc` template catalogue
//! - Every read and write is scoped to the caller's tenant
//! - Writes require project access (owner, member, or tenant-wide project)
//! - Content changes append an immutable snapshot and bump the version
//! - Writes are compare-and-swap on the version, so lost updates surface as
//!   `Conflict` instead of silently overwriting
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use projdoc::TemplateType;
//! use projdoc_registry::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let service = DocumentService::new(Arc::new(MemoryStorage::new()));
//! let ctx = RequestContext::new("alice", "acme");
//!
//! let project = service
//!     .create_project(&ctx, "Apollo".into(), ProjectVisibility::Private, vec![])
//!     .await?;
//!
//! let document = service
//!     .create_document(
//!         &ctx,
//!         project.id,
//!         CreateDocument {
//!             template_type: TemplateType::ProjectPlan,
//!             name: "Delivery plan".into(),
//!             description: None,
//!             content: None,
//!         },
//!     )
//!     .await?;
//!
//! assert_eq!(document.version, 1);
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod error;
pub mod service;
pub mod storage;

pub use entities::*;
pub use error::{RegistryError, Result};
pub use service::{
    CloneDocument, CreateDocument, DocumentDetails, DocumentService, DocumentStats,
    RestoreVersion, ServiceOptions, UpdateDocument,
};
pub use storage::{DocumentStore, MemoryStorage};

#[cfg(feature = "sqlite")]
pub use storage::SqliteStorage;
