//! Storage abstraction for projects, documents and version history

use crate::{entities::*, error::Result};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;

/// Persistence backend for the document service
///
/// Every lookup is scoped by tenant. Implementations return `Ok(None)` for
/// missing rows and leave the choice of error kind to the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace a user profile
    async fn save_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, tenant_id: &TenantId, user_id: &UserId) -> Result<Option<User>>;

    async fn create_project(&self, project: NewProject) -> Result<Project>;

    async fn get_project(&self, tenant_id: &TenantId, project_id: i64) -> Result<Option<Project>>;

    /// Documents of a project matching `filter`, in no particular order
    async fn list_documents(
        &self,
        tenant_id: &TenantId,
        project_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Vec<ProjectDocument>>;

    async fn get_document(&self, tenant_id: &TenantId, id: i64) -> Result<Option<ProjectDocument>>;

    async fn insert_document(&self, document: NewDocument) -> Result<ProjectDocument>;

    /// Write `document` if the stored version still equals `expected_version`
    ///
    /// The optional snapshot is appended in the same atomic step. A version
    /// mismatch fails with `Conflict` and leaves the store untouched.
    async fn update_document(
        &self,
        document: &ProjectDocument,
        expected_version: i64,
        snapshot: Option<NewDocumentVersion>,
    ) -> Result<()>;

    /// Hard delete together with the document's version history
    ///
    /// Returns false when no such document exists in the tenant.
    async fn delete_document(&self, tenant_id: &TenantId, id: i64) -> Result<bool>;

    /// Snapshots of a document, newest version first
    async fn list_versions(&self, document_id: i64, limit: Option<usize>) -> Result<Vec<DocumentVersion>>;

    async fn get_version(&self, document_id: i64, version: i64) -> Result<Option<DocumentVersion>>;
}
