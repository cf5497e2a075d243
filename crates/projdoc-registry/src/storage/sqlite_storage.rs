//! SQLite document store implementation
//!
//! Stores users, projects, documents and version history in a local SQLite
//! database. Version rows reference their document with `ON DELETE CASCADE`.

use super::DocumentStore;
use crate::{RegistryError, entities::*, error::Result};
use async_trait::async_trait;
use projdoc::TemplateType;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// SQLite-based document storage
pub struct SqliteStorage {
    pool: SqlitePool,
}

fn storage_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> RegistryError {
    move |e| RegistryError::Storage(format!("{}: {}", context, e))
}

fn format_timestamp(ts: OffsetDateTime) -> Result<String> {
    ts.format(&Rfc3339)
        .map_err(|e| RegistryError::Time(format!("Failed to format timestamp: {}", e)))
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| RegistryError::Time(format!("Failed to parse timestamp '{}': {}", raw, e)))
}

fn parse_template_type(raw: &str) -> Result<TemplateType> {
    raw.parse::<TemplateType>().map_err(RegistryError::from)
}

impl SqliteStorage {
    /// Open (or create) the database at `database_url` and ensure the schema
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RegistryError::Storage(format!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(storage_error("Failed to connect to SQLite"))?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Fresh private in-memory database, mostly for tests
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| RegistryError::Storage(format!("Invalid database path: {}", e)))?
            .foreign_keys(true);

        // A single connection, otherwise each pooled connection sees its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(storage_error("Failed to open in-memory SQLite"))?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                tenant_id TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                PRIMARY KEY (tenant_id, id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                visibility TEXT NOT NULL,        -- PRIVATE | TENANT
                created_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS project_members (
                project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                PRIMARY KEY (project_id, user_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS project_documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id TEXT NOT NULL,
                project_id INTEGER NOT NULL REFERENCES projects(id),
                template_type TEXT NOT NULL,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                content TEXT NOT NULL,           -- JSON
                status TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 1,
                last_edited_by TEXT NOT NULL,
                last_edited_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS project_document_versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_id INTEGER NOT NULL REFERENCES project_documents(id) ON DELETE CASCADE,
                version INTEGER NOT NULL,
                content TEXT NOT NULL,           -- JSON
                status TEXT NOT NULL,
                edited_by TEXT NOT NULL,
                edited_at TEXT NOT NULL,
                change_log TEXT,
                UNIQUE (document_id, version)
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_documents_project ON project_documents(tenant_id, project_id)",
            "CREATE INDEX IF NOT EXISTS idx_projects_tenant ON projects(tenant_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage_error("Failed to initialize schema"))?;
        }

        Ok(())
    }

    async fn project_members(&self, project_id: i64) -> Result<Vec<UserId>> {
        let rows = sqlx::query("SELECT user_id FROM project_members WHERE project_id = ? ORDER BY user_id")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to load project members"))?;

        Ok(rows
            .iter()
            .map(|row| UserId(row.get::<String, _>("user_id")))
            .collect())
    }

    fn row_to_document(row: &SqliteRow) -> Result<ProjectDocument> {
        let template_type: String = row.get("template_type");
        let template_type = parse_template_type(&template_type)?;
        let content: String = row.get("content");
        let description: Option<String> = row.get("description");
        let status: String = row.get("status");
        let last_edited_at: String = row.get("last_edited_at");
        let created_at: String = row.get("created_at");

        Ok(ProjectDocument {
            id: row.get("id"),
            tenant_id: TenantId(row.get("tenant_id")),
            project_id: row.get("project_id"),
            template_type,
            category: template_type.category(),
            name: row.get("name"),
            description,
            content: serde_json::from_str(&content)?,
            status: status.parse()?,
            version: row.get("version"),
            last_edited_by: UserId(row.get("last_edited_by")),
            last_edited_at: parse_timestamp(&last_edited_at)?,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn row_to_version(row: &SqliteRow) -> Result<DocumentVersion> {
        let content: String = row.get("content");
        let status: String = row.get("status");
        let edited_at: String = row.get("edited_at");

        Ok(DocumentVersion {
            id: row.get("id"),
            document_id: row.get("document_id"),
            version: row.get("version"),
            content: serde_json::from_str(&content)?,
            status: status.parse()?,
            edited_by: UserId(row.get("edited_by")),
            edited_at: parse_timestamp(&edited_at)?,
            change_log: row.get("change_log"),
        })
    }
}

const DOCUMENT_COLUMNS: &str = "id, tenant_id, project_id, template_type, category, name, description, \
     content, status, version, last_edited_by, last_edited_at, created_at";

const VERSION_COLUMNS: &str = "id, document_id, version, content, status, edited_by, edited_at, change_log";

#[async_trait]
impl DocumentStore for SqliteStorage {
    async fn save_user(&self, user: &User) -> Result<()> {
        let tenant_id = user
            .tenant_id
            .as_ref()
            .ok_or(RegistryError::TenantContextRequired)?;

        sqlx::query("INSERT OR REPLACE INTO users (tenant_id, id, name, email) VALUES (?, ?, ?, ?)")
            .bind(tenant_id.as_ref())
            .bind(user.id.as_ref())
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to save user"))?;

        Ok(())
    }

    async fn get_user(&self, tenant_id: &TenantId, user_id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email FROM users WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id.as_ref())
            .bind(user_id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to get user"))?;

        Ok(row.map(|row| User {
            id: UserId(row.get("id")),
            tenant_id: Some(tenant_id.clone()),
            name: row.get("name"),
            email: row.get("email"),
        }))
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let created_at = OffsetDateTime::now_utc();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to begin transaction"))?;

        let result = sqlx::query(
            "INSERT INTO projects (tenant_id, name, owner_id, visibility, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(project.tenant_id.as_ref())
        .bind(&project.name)
        .bind(project.owner_id.as_ref())
        .bind(project.visibility.as_str())
        .bind(format_timestamp(created_at)?)
        .execute(&mut *tx)
        .await
        .map_err(storage_error("Failed to create project"))?;

        let id = result.last_insert_rowid();

        for member in &project.member_ids {
            sqlx::query("INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?, ?)")
                .bind(id)
                .bind(member.as_ref())
                .execute(&mut *tx)
                .await
                .map_err(storage_error("Failed to add project member"))?;
        }

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit project"))?;

        Ok(Project {
            id,
            tenant_id: project.tenant_id,
            name: project.name,
            owner_id: project.owner_id,
            visibility: project.visibility,
            member_ids: project.member_ids,
            created_at,
        })
    }

    async fn get_project(&self, tenant_id: &TenantId, project_id: i64) -> Result<Option<Project>> {
        let row = sqlx::query(
            "SELECT id, tenant_id, name, owner_id, visibility, created_at FROM projects WHERE id = ? AND tenant_id = ?",
        )
        .bind(project_id)
        .bind(tenant_id.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("Failed to get project"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let visibility: String = row.get("visibility");
        let created_at: String = row.get("created_at");

        Ok(Some(Project {
            id: row.get("id"),
            tenant_id: TenantId(row.get("tenant_id")),
            name: row.get("name"),
            owner_id: UserId(row.get("owner_id")),
            visibility: visibility.parse()?,
            member_ids: self.project_members(project_id).await?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    async fn list_documents(
        &self,
        tenant_id: &TenantId,
        project_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Vec<ProjectDocument>> {
        let mut sql = format!(
            "SELECT {} FROM project_documents WHERE tenant_id = ? AND project_id = ?",
            DOCUMENT_COLUMNS
        );
        if filter.template_type.is_some() {
            sql.push_str(" AND template_type = ?");
        }
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }

        let mut query = sqlx::query(&sql).bind(tenant_id.as_ref()).bind(project_id);
        if let Some(template_type) = filter.template_type {
            query = query.bind(template_type.as_str());
        }
        if let Some(category) = filter.category {
            query = query.bind(category.as_str());
        }
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list documents"))?;

        // Search stays in Rust so case folding matches the in-memory store
        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let document = Self::row_to_document(row)?;
            if filter.matches(&document) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    async fn get_document(&self, tenant_id: &TenantId, id: i64) -> Result<Option<ProjectDocument>> {
        let sql = format!(
            "SELECT {} FROM project_documents WHERE id = ? AND tenant_id = ?",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(tenant_id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to get document"))?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn insert_document(&self, document: NewDocument) -> Result<ProjectDocument> {
        let now = OffsetDateTime::now_utc();
        let content = serde_json::to_string(&document.content)?;
        let timestamp = format_timestamp(now)?;

        let result = sqlx::query(
            r#"
            INSERT INTO project_documents
            (tenant_id, project_id, template_type, category, name, description, content, status,
             version, last_edited_by, last_edited_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?)
            "#,
        )
        .bind(document.tenant_id.as_ref())
        .bind(document.project_id)
        .bind(document.template_type.as_str())
        .bind(document.template_type.category().as_str())
        .bind(&document.name)
        .bind(&document.description)
        .bind(content)
        .bind(DocumentStatus::Draft.as_str())
        .bind(document.created_by.as_ref())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to insert document"))?;

        Ok(document.into_document(result.last_insert_rowid(), now))
    }

    async fn update_document(
        &self,
        document: &ProjectDocument,
        expected_version: i64,
        snapshot: Option<NewDocumentVersion>,
    ) -> Result<()> {
        let content = serde_json::to_string(&document.content)?;
        let last_edited_at = format_timestamp(document.last_edited_at)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to begin transaction"))?;

        let result = sqlx::query(
            r#"
            UPDATE project_documents
            SET name = ?, description = ?, content = ?, status = ?, version = ?,
                last_edited_by = ?, last_edited_at = ?
            WHERE id = ? AND tenant_id = ? AND version = ?
            "#,
        )
        .bind(&document.name)
        .bind(&document.description)
        .bind(content)
        .bind(document.status.as_str())
        .bind(document.version)
        .bind(document.last_edited_by.as_ref())
        .bind(last_edited_at)
        .bind(document.id)
        .bind(document.tenant_id.as_ref())
        .bind(expected_version)
        .execute(&mut *tx)
        .await
        .map_err(storage_error("Failed to update document"))?;

        if result.rows_affected() == 0 {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT version FROM project_documents WHERE id = ? AND tenant_id = ?")
                    .bind(document.id)
                    .bind(document.tenant_id.as_ref())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(storage_error("Failed to read document version"))?;

            // Dropping the transaction rolls it back
            return Err(match actual {
                Some(actual) => RegistryError::Conflict {
                    expected: expected_version,
                    actual,
                },
                None => RegistryError::DocumentNotFound(document.id),
            });
        }

        if let Some(snapshot) = snapshot {
            sqlx::query(
                r#"
                INSERT INTO project_document_versions
                (document_id, version, content, status, edited_by, edited_at, change_log)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(snapshot.document_id)
            .bind(snapshot.version)
            .bind(serde_json::to_string(&snapshot.content)?)
            .bind(snapshot.status.as_str())
            .bind(snapshot.edited_by.as_ref())
            .bind(format_timestamp(snapshot.edited_at)?)
            .bind(&snapshot.change_log)
            .execute(&mut *tx)
            .await
            .map_err(storage_error("Failed to append document version"))?;
        }

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit document update"))?;

        Ok(())
    }

    async fn delete_document(&self, tenant_id: &TenantId, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project_documents WHERE id = ? AND tenant_id = ?")
            .bind(id)
            .bind(tenant_id.as_ref())
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to delete document"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_versions(&self, document_id: i64, limit: Option<usize>) -> Result<Vec<DocumentVersion>> {
        let sql = format!(
            "SELECT {} FROM project_document_versions WHERE document_id = ? ORDER BY version DESC, id DESC LIMIT ?",
            VERSION_COLUMNS
        );
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let rows = sqlx::query(&sql)
            .bind(document_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list document versions"))?;

        rows.iter().map(Self::row_to_version).collect()
    }

    async fn get_version(&self, document_id: i64, version: i64) -> Result<Option<DocumentVersion>> {
        let sql = format!(
            "SELECT {} FROM project_document_versions WHERE document_id = ? AND version = ?",
            VERSION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(document_id)
            .bind(version)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to get document version"))?;

        row.as_ref().map(Self::row_to_version).transpose()
    }
}
