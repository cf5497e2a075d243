//! Core data structures for the projdoc registry

use crate::error::{RegistryError, Result};
use projdoc::{DocumentCategory, TemplateType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Unique identifier for a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a tenant, the isolation boundary for all data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        TenantId(s)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId(s.to_string())
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller identity for a single request
///
/// Passed explicitly to every service call instead of living in
/// request-scoped globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub tenant_id: Option<TenantId>,
}

impl RequestContext {
    pub fn new(user_id: impl Into<UserId>, tenant_id: impl Into<TenantId>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: Some(tenant_id.into()),
        }
    }

    /// Context for a caller with no established tenant
    pub fn without_tenant(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: None,
        }
    }

    /// The caller's tenant, or `TenantContextRequired`
    pub fn tenant(&self) -> Result<&TenantId> {
        self.tenant_id
            .as_ref()
            .ok_or(RegistryError::TenantContextRequired)
    }
}

/// A user profile, used to report editor identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(skip_serializing)]
    pub tenant_id: Option<TenantId>,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        tenant_id: impl Into<TenantId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id: Some(tenant_id.into()),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Who besides the owner and members can see a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectVisibility {
    /// Owner and listed members only
    #[default]
    Private,

    /// Everyone in the tenant
    Tenant,
}

impl ProjectVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectVisibility::Private => "PRIVATE",
            ProjectVisibility::Tenant => "TENANT",
        }
    }
}

impl FromStr for ProjectVisibility {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PRIVATE" => Ok(ProjectVisibility::Private),
            "TENANT" => Ok(ProjectVisibility::Tenant),
            other => Err(RegistryError::Storage(format!(
                "Unknown project visibility: {}",
                other
            ))),
        }
    }
}

/// A project that owns documents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    #[serde(skip_serializing)]
    pub tenant_id: TenantId,
    pub name: String,
    pub owner_id: UserId,
    pub visibility: ProjectVisibility,
    pub member_ids: Vec<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Project {
    /// Owner, tenant-wide visibility, or membership grants access
    pub fn grants_access(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
            || self.visibility == ProjectVisibility::Tenant
            || self.member_ids.contains(user_id)
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            name: self.name.clone(),
            owner_id: self.owner_id.clone(),
            visibility: self.visibility,
        }
    }
}

/// Parent project as embedded in document details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: i64,
    pub name: String,
    pub owner_id: UserId,
    pub visibility: ProjectVisibility,
}

/// Data needed to insert a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub tenant_id: TenantId,
    pub name: String,
    pub owner_id: UserId,
    pub visibility: ProjectVisibility,
    pub member_ids: Vec<UserId>,
}

/// Review status of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Draft,
    InReview,
    Approved,
    Archived,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::Draft,
        DocumentStatus::InReview,
        DocumentStatus::Approved,
        DocumentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::InReview => "IN_REVIEW",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        DocumentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| RegistryError::InvalidStatus(s.to_string()))
    }
}

/// The live, mutable project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: i64,

    /// Set at creation, never changed
    pub tenant_id: TenantId,

    pub project_id: i64,
    pub template_type: TemplateType,
    pub category: DocumentCategory,
    pub name: String,
    pub description: Option<String>,

    /// Free-form JSON, not checked against the template shape
    pub content: Value,

    pub status: DocumentStatus,

    /// Content revision, starts at 1
    pub version: i64,

    pub last_edited_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub last_edited_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProjectDocument {
    /// Listing order: category ascending, most recently edited first
    pub fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.category
            .cmp(&b.category)
            .then_with(|| b.last_edited_at.cmp(&a.last_edited_at))
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Data needed to insert a document; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub tenant_id: TenantId,
    pub project_id: i64,
    pub template_type: TemplateType,
    pub name: String,
    pub description: Option<String>,
    pub content: Value,
    pub created_by: UserId,
}

impl NewDocument {
    /// Materialize as a fresh DRAFT document at version 1
    pub fn into_document(self, id: i64, now: OffsetDateTime) -> ProjectDocument {
        ProjectDocument {
            id,
            tenant_id: self.tenant_id,
            project_id: self.project_id,
            template_type: self.template_type,
            category: self.template_type.category(),
            name: self.name,
            description: self.description,
            content: self.content,
            status: DocumentStatus::Draft,
            version: 1,
            last_edited_by: self.created_by,
            last_edited_at: now,
            created_at: now,
        }
    }
}

/// An immutable snapshot in a document's version history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: i64,
    pub document_id: i64,
    pub version: i64,
    pub content: Value,
    pub status: DocumentStatus,
    pub edited_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub edited_at: OffsetDateTime,
    pub change_log: Option<String>,
}

/// A snapshot waiting to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocumentVersion {
    pub document_id: i64,
    pub version: i64,
    pub content: Value,
    pub status: DocumentStatus,
    pub edited_by: UserId,
    pub edited_at: OffsetDateTime,
    pub change_log: Option<String>,
}

impl NewDocumentVersion {
    /// Capture the document exactly as it is now
    pub fn snapshot_of(document: &ProjectDocument, change_log: Option<String>) -> Self {
        Self {
            document_id: document.id,
            version: document.version,
            content: document.content.clone(),
            status: document.status,
            edited_by: document.last_edited_by.clone(),
            edited_at: document.last_edited_at,
            change_log,
        }
    }

    pub fn into_version(self, id: i64) -> DocumentVersion {
        DocumentVersion {
            id,
            document_id: self.document_id,
            version: self.version,
            content: self.content,
            status: self.status,
            edited_by: self.edited_by,
            edited_at: self.edited_at,
            change_log: self.change_log,
        }
    }
}

/// Optional narrowing for document listings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub template_type: Option<TemplateType>,
    pub category: Option<DocumentCategory>,
    pub status: Option<DocumentStatus>,

    /// Case-insensitive substring over name and description
    pub search: Option<String>,
}

impl DocumentFilter {
    pub fn matches(&self, document: &ProjectDocument) -> bool {
        if self.template_type.is_some_and(|t| t != document.template_type) {
            return false;
        }
        if self.category.is_some_and(|c| c != document.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != document.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                document.name.to_lowercase().contains(&term)
                    || document
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}
