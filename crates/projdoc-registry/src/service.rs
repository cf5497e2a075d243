//! Document service: access control, CRUD and versioning over a `DocumentStore`

use crate::{
    RegistryError,
    entities::*,
    error::Result,
    storage::DocumentStore,
};
use projdoc::{DocumentCategory, DocumentContent, TemplateType, templates};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Number of snapshots embedded in document details
pub const RECENT_VERSIONS_LIMIT: usize = 10;

/// Behavioural switches for the service
#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    /// Apply the project access check to reads as well as writes
    pub check_read_access: bool,

    /// Reject content that does not match its template's shape
    pub validate_content_on_write: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            check_read_access: true,
            validate_content_on_write: false,
        }
    }
}

/// Input for creating a document from a template
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub template_type: TemplateType,
    pub name: String,
    pub description: Option<String>,

    /// Falls back to the template's default content
    pub content: Option<Value>,
}

/// Partial update; every field is independently optional
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub name: Option<String>,

    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub content: Option<Value>,
    pub status: Option<DocumentStatus>,

    /// Version the caller last read; mismatch fails with `Conflict`
    pub expected_version: Option<i64>,

    /// Note stored on the snapshot taken for a content change
    pub change_log: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CloneDocument {
    /// Defaults to "<source name> (Copy)"
    pub name: Option<String>,

    /// Defaults to the source document's project
    pub target_project_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct RestoreVersion {
    pub version: i64,
    pub expected_version: Option<i64>,
}

/// A document with its editor, parent project and recent history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetails {
    #[serde(flatten)]
    pub document: ProjectDocument,
    pub last_editor: Option<User>,
    pub project: ProjectSummary,
    pub recent_versions: Vec<DocumentVersion>,
}

/// Document counts for a project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub project_id: i64,
    pub total: usize,
    pub by_status: BTreeMap<DocumentStatus, usize>,
    pub by_category: BTreeMap<DocumentCategory, usize>,
}

/// Versioned, access-controlled project documents
#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    options: ServiceOptions,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_options(store, ServiceOptions::default())
    }

    pub fn with_options(store: Arc<dyn DocumentStore>, options: ServiceOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    /// Direct access to the backing store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // === Access control ===

    /// Load the project in the caller's tenant and check the caller may use it
    pub async fn ensure_project_access(&self, ctx: &RequestContext, project_id: i64) -> Result<Project> {
        let tenant_id = ctx.tenant()?;
        let project = self
            .store
            .get_project(tenant_id, project_id)
            .await?
            .ok_or(RegistryError::ProjectNotFound(project_id))?;

        if !project.grants_access(&ctx.user_id) {
            warn!(
                "User {} denied access to project {} in tenant {}",
                ctx.user_id, project_id, tenant_id
            );
            return Err(RegistryError::AccessDenied(format!(
                "user {} cannot access project {}",
                ctx.user_id, project_id
            )));
        }

        Ok(project)
    }

    /// Project lookup for reads, which only check access when configured to
    async fn read_project(&self, ctx: &RequestContext, project_id: i64) -> Result<Project> {
        if self.options.check_read_access {
            return self.ensure_project_access(ctx, project_id).await;
        }
        self.store
            .get_project(ctx.tenant()?, project_id)
            .await?
            .ok_or(RegistryError::ProjectNotFound(project_id))
    }

    async fn load_document(&self, tenant_id: &TenantId, id: i64) -> Result<ProjectDocument> {
        self.store
            .get_document(tenant_id, id)
            .await?
            .ok_or(RegistryError::DocumentNotFound(id))
    }

    fn check_expected_version(document: &ProjectDocument, expected: Option<i64>) -> Result<()> {
        match expected {
            Some(expected) if expected != document.version => Err(RegistryError::Conflict {
                expected,
                actual: document.version,
            }),
            _ => Ok(()),
        }
    }

    fn check_content(&self, template_type: TemplateType, content: &Value) -> Result<()> {
        if self.options.validate_content_on_write {
            DocumentContent::parse(template_type, content)?;
        }
        Ok(())
    }

    // === Projects and users ===

    /// Create a project in the caller's tenant, owned by the caller
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        name: String,
        visibility: ProjectVisibility,
        member_ids: Vec<UserId>,
    ) -> Result<Project> {
        let tenant_id = ctx.tenant()?;
        let project = self
            .store
            .create_project(NewProject {
                tenant_id: tenant_id.clone(),
                name,
                owner_id: ctx.user_id.clone(),
                visibility,
                member_ids,
            })
            .await?;

        info!("Created project {} in tenant {}", project.id, tenant_id);
        Ok(project)
    }

    pub async fn get_project(&self, ctx: &RequestContext, project_id: i64) -> Result<Project> {
        self.read_project(ctx, project_id).await
    }

    /// Record the caller's display name and email
    pub async fn save_profile(&self, ctx: &RequestContext, name: String, email: String) -> Result<User> {
        let user = User {
            id: ctx.user_id.clone(),
            tenant_id: Some(ctx.tenant()?.clone()),
            name,
            email,
        };
        self.store.save_user(&user).await?;
        Ok(user)
    }

    // === Documents ===

    /// Documents of a project, ordered by category then most recently edited
    pub async fn list_documents(
        &self,
        ctx: &RequestContext,
        project_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Vec<ProjectDocument>> {
        let tenant_id = ctx.tenant()?;
        if self.options.check_read_access {
            self.ensure_project_access(ctx, project_id).await?;
        }

        let mut documents = self.store.list_documents(tenant_id, project_id, filter).await?;
        documents.retain(|d| filter.matches(d));
        documents.sort_by(ProjectDocument::listing_order);

        debug!("Listed {} documents for project {}", documents.len(), project_id);
        Ok(documents)
    }

    pub async fn get_document(&self, ctx: &RequestContext, id: i64) -> Result<DocumentDetails> {
        let tenant_id = ctx.tenant()?;
        let document = self.load_document(tenant_id, id).await?;
        let project = self.read_project(ctx, document.project_id).await?;

        let last_editor = self.store.get_user(tenant_id, &document.last_edited_by).await?;
        let recent_versions = self
            .store
            .list_versions(document.id, Some(RECENT_VERSIONS_LIMIT))
            .await?;

        Ok(DocumentDetails {
            document,
            last_editor,
            project: project.summary(),
            recent_versions,
        })
    }

    /// Create a DRAFT document at version 1 from a template
    pub async fn create_document(
        &self,
        ctx: &RequestContext,
        project_id: i64,
        input: CreateDocument,
    ) -> Result<ProjectDocument> {
        let tenant_id = ctx.tenant()?;
        self.ensure_project_access(ctx, project_id).await?;

        let template = templates::get_template(input.template_type)
            .ok_or_else(|| RegistryError::UnknownTemplateType(input.template_type.to_string()))?;

        let content = match input.content {
            Some(content) => content,
            None => templates::get_default_content(template.template_type),
        };
        self.check_content(template.template_type, &content)?;

        let document = self
            .store
            .insert_document(NewDocument {
                tenant_id: tenant_id.clone(),
                project_id,
                template_type: template.template_type,
                name: input.name,
                description: input.description,
                content,
                created_by: ctx.user_id.clone(),
            })
            .await?;

        info!(
            "Created {} document {} in project {}",
            document.template_type, document.id, project_id
        );
        Ok(document)
    }

    /// Apply a partial update
    ///
    /// A content change snapshots the pre-update state under the current
    /// version number and then bumps the version. Metadata and status edits
    /// leave the version alone.
    pub async fn update_document(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: UpdateDocument,
    ) -> Result<ProjectDocument> {
        let tenant_id = ctx.tenant()?;
        let mut document = self.load_document(tenant_id, id).await?;
        self.ensure_project_access(ctx, document.project_id).await?;
        Self::check_expected_version(&document, input.expected_version)?;

        let read_version = document.version;
        let snapshot = input
            .content
            .as_ref()
            .map(|_| NewDocumentVersion::snapshot_of(&document, input.change_log.clone()));

        if let Some(name) = input.name {
            document.name = name;
        }
        if let Some(description) = input.description {
            document.description = description;
        }
        if let Some(status) = input.status {
            document.status = status;
        }
        if let Some(content) = input.content {
            self.check_content(document.template_type, &content)?;
            document.content = content;
            document.version = read_version + 1;
        }
        document.last_edited_by = ctx.user_id.clone();
        document.last_edited_at = OffsetDateTime::now_utc();

        self.store
            .update_document(&document, read_version, snapshot)
            .await?;

        info!(
            "Updated document {} (version {} -> {})",
            document.id, read_version, document.version
        );
        Ok(document)
    }

    /// Change only the status; content and version are untouched
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: i64,
        status: DocumentStatus,
        expected_version: Option<i64>,
    ) -> Result<ProjectDocument> {
        let tenant_id = ctx.tenant()?;
        let mut document = self.load_document(tenant_id, id).await?;
        self.ensure_project_access(ctx, document.project_id).await?;
        Self::check_expected_version(&document, expected_version)?;

        document.status = status;
        document.last_edited_by = ctx.user_id.clone();
        document.last_edited_at = OffsetDateTime::now_utc();

        self.store
            .update_document(&document, document.version, None)
            .await?;

        info!("Document {} status set to {}", document.id, status);
        Ok(document)
    }

    /// Hard delete; version history goes with it
    pub async fn delete_document(&self, ctx: &RequestContext, id: i64) -> Result<()> {
        let tenant_id = ctx.tenant()?;
        let document = self.load_document(tenant_id, id).await?;
        self.ensure_project_access(ctx, document.project_id).await?;

        if !self.store.delete_document(tenant_id, id).await? {
            return Err(RegistryError::DocumentNotFound(id));
        }

        info!("Deleted document {} from project {}", id, document.project_id);
        Ok(())
    }

    /// Copy a document into a new DRAFT at version 1 without its history
    pub async fn clone_document(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: CloneDocument,
    ) -> Result<ProjectDocument> {
        let tenant_id = ctx.tenant()?;
        let source = self.load_document(tenant_id, id).await?;
        self.ensure_project_access(ctx, source.project_id).await?;

        let project_id = input.target_project_id.unwrap_or(source.project_id);
        if project_id != source.project_id {
            self.ensure_project_access(ctx, project_id).await?;
        }

        let name = input
            .name
            .unwrap_or_else(|| format!("{} (Copy)", source.name));

        let clone = self
            .store
            .insert_document(NewDocument {
                tenant_id: tenant_id.clone(),
                project_id,
                template_type: source.template_type,
                name,
                description: source.description,
                content: source.content,
                created_by: ctx.user_id.clone(),
            })
            .await?;

        info!("Cloned document {} into {}", id, clone.id);
        Ok(clone)
    }

    /// Counts by status and category for a project
    pub async fn document_stats(&self, ctx: &RequestContext, project_id: i64) -> Result<DocumentStats> {
        let documents = self
            .list_documents(ctx, project_id, &DocumentFilter::default())
            .await?;

        let mut by_status: BTreeMap<DocumentStatus, usize> =
            DocumentStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        let mut by_category: BTreeMap<DocumentCategory, usize> =
            DocumentCategory::ALL.into_iter().map(|c| (c, 0)).collect();

        for document in &documents {
            *by_status.entry(document.status).or_default() += 1;
            *by_category.entry(document.category).or_default() += 1;
        }

        Ok(DocumentStats {
            project_id,
            total: documents.len(),
            by_status,
            by_category,
        })
    }

    // === Versions ===

    /// Full history, newest version first
    pub async fn list_versions(&self, ctx: &RequestContext, id: i64) -> Result<Vec<DocumentVersion>> {
        let tenant_id = ctx.tenant()?;
        let document = self.load_document(tenant_id, id).await?;
        if self.options.check_read_access {
            self.ensure_project_access(ctx, document.project_id).await?;
        }

        self.store.list_versions(document.id, None).await
    }

    /// A single snapshot, or `None` when that version was never recorded
    pub async fn get_version(
        &self,
        ctx: &RequestContext,
        id: i64,
        version: i64,
    ) -> Result<Option<DocumentVersion>> {
        let tenant_id = ctx.tenant()?;
        let document = self.load_document(tenant_id, id).await?;
        if self.options.check_read_access {
            self.ensure_project_access(ctx, document.project_id).await?;
        }

        self.store.get_version(document.id, version).await
    }

    /// Bring back the content and status of an earlier version
    ///
    /// The live state is snapshotted first, then overwritten, and the version
    /// moves forward. Name and description are not restored.
    pub async fn restore_version(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: RestoreVersion,
    ) -> Result<ProjectDocument> {
        let tenant_id = ctx.tenant()?;
        let mut document = self.load_document(tenant_id, id).await?;
        self.ensure_project_access(ctx, document.project_id).await?;
        Self::check_expected_version(&document, input.expected_version)?;

        let target = self
            .store
            .get_version(document.id, input.version)
            .await?
            .ok_or(RegistryError::VersionNotFound {
                document_id: document.id,
                version: input.version,
            })?;

        let read_version = document.version;
        let snapshot = NewDocumentVersion::snapshot_of(
            &document,
            Some(format!("Before restore to version {}", input.version)),
        );

        self.check_content(document.template_type, &target.content)?;
        document.content = target.content;
        document.status = target.status;
        document.version = read_version + 1;
        document.last_edited_by = ctx.user_id.clone();
        document.last_edited_at = OffsetDateTime::now_utc();

        self.store
            .update_document(&document, read_version, Some(snapshot))
            .await?;

        info!(
            "Restored document {} to version {} (now version {})",
            document.id, input.version, document.version
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    async fn setup(visibility: ProjectVisibility) -> (DocumentService, RequestContext, i64) {
        let service = DocumentService::new(Arc::new(MemoryStorage::new()));
        let owner = RequestContext::new("owner", "acme");
        let project = service
            .create_project(&owner, "Apollo".to_string(), visibility, vec!["member".into()])
            .await
            .unwrap();
        (service, owner, project.id)
    }

    fn create_input(template_type: TemplateType) -> CreateDocument {
        CreateDocument {
            template_type,
            name: "Plan".to_string(),
            description: None,
            content: None,
        }
    }

    #[tokio::test]
    async fn test_status_update_keeps_version() {
        let (service, owner, project_id) = setup(ProjectVisibility::Private).await;
        let doc = service
            .create_document(&owner, project_id, create_input(TemplateType::ProjectPlan))
            .await
            .unwrap();

        let updated = service
            .update_status(&owner, doc.id, DocumentStatus::InReview, None)
            .await
            .unwrap();
        assert_eq!(updated.status, DocumentStatus::InReview);
        assert_eq!(updated.version, 1);
        assert_eq!(updated.content, doc.content);

        let metadata_only = service
            .update_document(
                &owner,
                doc.id,
                UpdateDocument {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(metadata_only.version, 1);
        assert!(service.list_versions(&owner, doc.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_member_may_edit_stranger_may_not() {
        let (service, owner, project_id) = setup(ProjectVisibility::Private).await;
        let doc = service
            .create_document(&owner, project_id, create_input(TemplateType::IssueLog))
            .await
            .unwrap();

        let member = RequestContext::new("member", "acme");
        let updated = service
            .update_document(
                &member,
                doc.id,
                UpdateDocument {
                    content: Some(json!({ "issues": [] })),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.last_edited_by, UserId::from("member"));

        let stranger = RequestContext::new("stranger", "acme");
        let err = service
            .update_status(&stranger, doc.id, DocumentStatus::Archived, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_create_requires_tenant_context() {
        let (service, _owner, project_id) = setup(ProjectVisibility::Tenant).await;
        let no_tenant = RequestContext::without_tenant("owner");
        let err = service
            .create_document(&no_tenant, project_id, create_input(TemplateType::ModelCard))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::TenantContextRequired));
    }

    #[tokio::test]
    async fn test_stale_expected_version_conflicts() {
        let (service, owner, project_id) = setup(ProjectVisibility::Private).await;
        let doc = service
            .create_document(&owner, project_id, create_input(TemplateType::DecisionLog))
            .await
            .unwrap();

        let edit = |n: i64| UpdateDocument {
            content: Some(json!({ "decisions": [{ "id": format!("D{}", n) }] })),
            expected_version: Some(1),
            ..Default::default()
        };

        service.update_document(&owner, doc.id, edit(1)).await.unwrap();
        let err = service.update_document(&owner, doc.id, edit(2)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { expected: 1, actual: 2 }));
    }

    #[tokio::test]
    async fn test_stats_count_every_status_and_category() {
        let (service, owner, project_id) = setup(ProjectVisibility::Private).await;
        for t in [TemplateType::ProjectPlan, TemplateType::RiskRegister, TemplateType::ModelCard] {
            service
                .create_document(&owner, project_id, create_input(t))
                .await
                .unwrap();
        }

        let stats = service.document_stats(&owner, project_id).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status[&DocumentStatus::Draft], 3);
        assert_eq!(stats.by_status[&DocumentStatus::Approved], 0);
        assert_eq!(stats.by_category[&DocumentCategory::Core], 2);
        assert_eq!(stats.by_category[&DocumentCategory::Lifecycle], 0);
        assert_eq!(stats.by_category[&DocumentCategory::AiSpecific], 1);
    }

    #[tokio::test]
    async fn test_restore_respects_content_validation() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStorage::new());
        let lax = DocumentService::new(store.clone());
        let strict = DocumentService::with_options(
            store,
            ServiceOptions {
                validate_content_on_write: true,
                ..Default::default()
            },
        );
        let owner = RequestContext::new("owner", "acme");
        let project = lax
            .create_project(&owner, "Apollo".to_string(), ProjectVisibility::Private, vec![])
            .await
            .unwrap();

        let mut input = create_input(TemplateType::RiskRegister);
        input.content = Some(json!({ "risks": 42 }));
        let doc = lax.create_document(&owner, project.id, input).await.unwrap();
        strict
            .update_document(
                &owner,
                doc.id,
                UpdateDocument {
                    content: Some(json!({ "risks": [] })),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let restore = |version| RestoreVersion {
            version,
            expected_version: None,
        };
        let err = strict.restore_version(&owner, doc.id, restore(1)).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidContent(_)));
        assert_eq!(strict.get_document(&owner, doc.id).await.unwrap().document.version, 2);

        let restored = lax.restore_version(&owner, doc.id, restore(1)).await.unwrap();
        assert_eq!(restored.content, json!({ "risks": 42 }));
    }

    #[tokio::test]
    async fn test_update_can_clear_description() {
        let (service, owner, project_id) = setup(ProjectVisibility::Private).await;
        let mut input = create_input(TemplateType::ProjectCharter);
        input.description = Some("Charter for Apollo".to_string());
        let doc = service.create_document(&owner, project_id, input).await.unwrap();

        let renamed = service
            .update_document(
                &owner,
                doc.id,
                UpdateDocument {
                    name: Some("Charter".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.description.as_deref(), Some("Charter for Apollo"));

        let cleared = service
            .update_document(
                &owner,
                doc.id,
                UpdateDocument {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.version, 1);
    }

    #[tokio::test]
    async fn test_validate_content_on_write() {
        let store = Arc::new(MemoryStorage::new());
        let service = DocumentService::with_options(
            store,
            ServiceOptions {
                validate_content_on_write: true,
                ..Default::default()
            },
        );
        let owner = RequestContext::new("owner", "acme");
        let project = service
            .create_project(&owner, "Apollo".to_string(), ProjectVisibility::Private, vec![])
            .await
            .unwrap();

        let mut input = create_input(TemplateType::RiskRegister);
        input.content = Some(json!({ "risks": 42 }));
        let err = service
            .create_document(&owner, project.id, input)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidContent(_)));
    }
}
