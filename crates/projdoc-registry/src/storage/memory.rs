//! In-memory document store for testing and development

use super::DocumentStore;
use crate::{RegistryError, entities::*, error::Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<(TenantId, UserId), User>,
    projects: HashMap<i64, Project>,
    documents: HashMap<i64, ProjectDocument>,
    versions: Vec<DocumentVersion>,
    next_project_id: i64,
    next_document_id: i64,
    next_version_id: i64,
}

/// In-memory storage implementation
///
/// One mutex guards all tables, so every trait call is atomic.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RegistryError::Storage("Lock poisoned".into()))
    }

    /// Number of stored version rows across all documents (useful for testing)
    pub fn version_count(&self) -> usize {
        self.state.lock().map(|s| s.versions.len()).unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStorage {
    async fn save_user(&self, user: &User) -> Result<()> {
        let tenant_id = user
            .tenant_id
            .clone()
            .ok_or(RegistryError::TenantContextRequired)?;
        let mut state = self.lock()?;
        state.users.insert((tenant_id, user.id.clone()), user.clone());
        Ok(())
    }

    async fn get_user(&self, tenant_id: &TenantId, user_id: &UserId) -> Result<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .get(&(tenant_id.clone(), user_id.clone()))
            .cloned())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let mut state = self.lock()?;
        state.next_project_id += 1;
        let project = Project {
            id: state.next_project_id,
            tenant_id: project.tenant_id,
            name: project.name,
            owner_id: project.owner_id,
            visibility: project.visibility,
            member_ids: project.member_ids,
            created_at: OffsetDateTime::now_utc(),
        };
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, tenant_id: &TenantId, project_id: i64) -> Result<Option<Project>> {
        let state = self.lock()?;
        Ok(state
            .projects
            .get(&project_id)
            .filter(|p| &p.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_documents(
        &self,
        tenant_id: &TenantId,
        project_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Vec<ProjectDocument>> {
        let state = self.lock()?;
        Ok(state
            .documents
            .values()
            .filter(|d| &d.tenant_id == tenant_id && d.project_id == project_id)
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn get_document(&self, tenant_id: &TenantId, id: i64) -> Result<Option<ProjectDocument>> {
        let state = self.lock()?;
        Ok(state
            .documents
            .get(&id)
            .filter(|d| &d.tenant_id == tenant_id)
            .cloned())
    }

    async fn insert_document(&self, document: NewDocument) -> Result<ProjectDocument> {
        let mut state = self.lock()?;
        state.next_document_id += 1;
        let document = document.into_document(state.next_document_id, OffsetDateTime::now_utc());
        state.documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        document: &ProjectDocument,
        expected_version: i64,
        snapshot: Option<NewDocumentVersion>,
    ) -> Result<()> {
        let mut state = self.lock()?;
        let actual = state
            .documents
            .get(&document.id)
            .filter(|d| d.tenant_id == document.tenant_id)
            .map(|d| d.version)
            .ok_or(RegistryError::DocumentNotFound(document.id))?;

        if actual != expected_version {
            return Err(RegistryError::Conflict {
                expected: expected_version,
                actual,
            });
        }

        if let Some(snapshot) = snapshot {
            state.next_version_id += 1;
            let version = snapshot.into_version(state.next_version_id);
            state.versions.push(version);
        }
        state.documents.insert(document.id, document.clone());
        Ok(())
    }

    async fn delete_document(&self, tenant_id: &TenantId, id: i64) -> Result<bool> {
        let mut state = self.lock()?;
        let owned = state
            .documents
            .get(&id)
            .is_some_and(|d| &d.tenant_id == tenant_id);
        if !owned {
            return Ok(false);
        }
        state.documents.remove(&id);
        state.versions.retain(|v| v.document_id != id);
        Ok(true)
    }

    async fn list_versions(&self, document_id: i64, limit: Option<usize>) -> Result<Vec<DocumentVersion>> {
        let state = self.lock()?;
        let mut versions: Vec<DocumentVersion> = state
            .versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version).then_with(|| b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            versions.truncate(limit);
        }
        Ok(versions)
    }

    async fn get_version(&self, document_id: i64, version: i64) -> Result<Option<DocumentVersion>> {
        let state = self.lock()?;
        Ok(state
            .versions
            .iter()
            .find(|v| v.document_id == document_id && v.version == version)
            .cloned())
    }
}
