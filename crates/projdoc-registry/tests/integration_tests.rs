//! Integration tests for projdoc-registry

use projdoc::{TemplateType, templates};
use projdoc_registry::*;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

struct Fixture {
    service: DocumentService,
    owner: RequestContext,
    project_id: i64,
}

async fn fixture(store: Arc<dyn DocumentStore>) -> Fixture {
    let service = DocumentService::new(store);
    let owner = RequestContext::new("alice", "acme");
    service
        .save_profile(&owner, "Alice".to_string(), "alice@acme.test".to_string())
        .await
        .unwrap();
    let project = service
        .create_project(
            &owner,
            "Apollo".to_string(),
            ProjectVisibility::Private,
            vec!["bob".into()],
        )
        .await
        .unwrap();

    Fixture {
        service,
        owner,
        project_id: project.id,
    }
}

async fn sqlite_fixture(dir: &tempfile::TempDir) -> Fixture {
    let db_path = format!("sqlite:{}/test.db", dir.path().display());
    let storage = SqliteStorage::new(&db_path).await.unwrap();
    fixture(Arc::new(storage)).await
}

fn plan() -> CreateDocument {
    CreateDocument {
        template_type: TemplateType::ProjectPlan,
        name: "Delivery plan".to_string(),
        description: Some("Phases for the Apollo rollout".to_string()),
        content: None,
    }
}

async fn update_restore_scenario(f: Fixture) {
    let service = &f.service;
    let ctx = &f.owner;

    let created = service.create_document(ctx, f.project_id, plan()).await.unwrap();
    assert_eq!(created.version, 1);
    assert_eq!(created.status, DocumentStatus::Draft);
    assert_eq!(
        created.content,
        templates::get_default_content(TemplateType::ProjectPlan)
    );

    let new_content = json!({ "overview": "Ship in Q3", "phases": [] });
    let updated = service
        .update_document(
            ctx,
            created.id,
            UpdateDocument {
                content: Some(new_content.clone()),
                status: Some(DocumentStatus::InReview),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.content, new_content);

    let history = service.list_versions(ctx, created.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].version, 1);
    assert_eq!(history[0].content, created.content);
    assert_eq!(history[0].status, DocumentStatus::Draft);

    let restored = service
        .restore_version(
            ctx,
            created.id,
            RestoreVersion {
                version: 1,
                expected_version: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(restored.version, 3);
    assert_eq!(restored.content, created.content);
    assert_eq!(restored.status, DocumentStatus::Draft);
    assert_eq!(restored.name, "Delivery plan");

    let history = service.list_versions(ctx, created.id).await.unwrap();
    let versions: Vec<i64> = history.iter().map(|v| v.version).collect();
    assert_eq!(versions, vec![2, 1]);
    assert_eq!(
        history[0].change_log.as_deref(),
        Some("Before restore to version 1")
    );
    assert_eq!(history[0].content, new_content);
    assert_eq!(history[0].status, DocumentStatus::InReview);

    let details = service.get_document(ctx, created.id).await.unwrap();
    assert_eq!(details.document.version, 3);
    assert_eq!(details.project.name, "Apollo");
    assert_eq!(details.last_editor.unwrap().name, "Alice");
    assert_eq!(details.recent_versions.len(), 2);

    assert!(service.get_version(ctx, created.id, 2).await.unwrap().is_some());
    assert!(service.get_version(ctx, created.id, 3).await.unwrap().is_none());

    let missing = service
        .restore_version(
            ctx,
            created.id,
            RestoreVersion {
                version: 7,
                expected_version: None,
            },
        )
        .await;
    assert!(matches!(
        missing,
        Err(RegistryError::VersionNotFound { version: 7, .. })
    ));
}

#[tokio::test]
async fn test_update_and_restore_in_memory() {
    update_restore_scenario(fixture(Arc::new(MemoryStorage::new())).await).await;
}

#[tokio::test]
async fn test_update_and_restore_sqlite() {
    let dir = tempdir().unwrap();
    update_restore_scenario(sqlite_fixture(&dir).await).await;
}

#[tokio::test]
async fn test_version_sequence_is_monotonic() {
    let dir = tempdir().unwrap();
    let f = sqlite_fixture(&dir).await;
    let doc = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();

    let mut seen = vec![doc.version];
    for i in 0..4 {
        let updated = f
            .service
            .update_document(
                &f.owner,
                doc.id,
                UpdateDocument {
                    content: Some(json!({ "overview": format!("rev {}", i) })),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        seen.push(updated.version);

        let status_only = f
            .service
            .update_status(&f.owner, doc.id, DocumentStatus::InReview, None)
            .await
            .unwrap();
        assert_eq!(status_only.version, updated.version);
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_stale_write_is_rejected_by_sqlite() {
    let dir = tempdir().unwrap();
    let f = sqlite_fixture(&dir).await;
    let doc = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();

    // Two writers read version 1; the second one loses
    let mut first = doc.clone();
    first.content = json!({ "overview": "first" });
    first.version = 2;
    f.service
        .store()
        .update_document(&first, 1, None)
        .await
        .unwrap();

    let mut second = doc.clone();
    second.content = json!({ "overview": "second" });
    second.version = 2;
    let err = f
        .service
        .store()
        .update_document(&second, 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Conflict { expected: 1, actual: 2 }));

    let stored = f.service.get_document(&f.owner, doc.id).await.unwrap();
    assert_eq!(stored.document.content, json!({ "overview": "first" }));
}

#[tokio::test]
async fn test_access_denied_on_every_mutation() {
    let f = fixture(Arc::new(MemoryStorage::new())).await;
    let doc = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();
    let mallory = RequestContext::new("mallory", "acme");

    let denied = |r: Result<()>| matches!(r, Err(RegistryError::AccessDenied(_)));

    assert!(denied(
        f.service
            .create_document(&mallory, f.project_id, plan())
            .await
            .map(|_| ())
    ));
    assert!(denied(
        f.service
            .update_document(&mallory, doc.id, UpdateDocument::default())
            .await
            .map(|_| ())
    ));
    assert!(denied(
        f.service
            .update_status(&mallory, doc.id, DocumentStatus::Approved, None)
            .await
            .map(|_| ())
    ));
    assert!(denied(
        f.service
            .clone_document(&mallory, doc.id, CloneDocument::default())
            .await
            .map(|_| ())
    ));
    assert!(denied(
        f.service
            .restore_version(
                &mallory,
                doc.id,
                RestoreVersion {
                    version: 1,
                    expected_version: None
                }
            )
            .await
            .map(|_| ())
    ));
    assert!(denied(f.service.delete_document(&mallory, doc.id).await));

    // Reads are access checked by default
    assert!(denied(f.service.get_document(&mallory, doc.id).await.map(|_| ())));

    // The member listed on the project is allowed
    let bob = RequestContext::new("bob", "acme");
    assert!(f.service.get_document(&bob, doc.id).await.is_ok());
}

#[tokio::test]
async fn test_reads_skip_project_check_when_configured() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStorage::new());
    let f = fixture(store.clone()).await;
    let doc = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();

    let lax = DocumentService::with_options(
        store,
        ServiceOptions {
            check_read_access: false,
            ..Default::default()
        },
    );
    let mallory = RequestContext::new("mallory", "acme");

    assert!(lax.get_document(&mallory, doc.id).await.is_ok());
    assert_eq!(
        lax.list_documents(&mallory, f.project_id, &DocumentFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(matches!(
        lax.delete_document(&mallory, doc.id).await,
        Err(RegistryError::AccessDenied(_))
    ));
}

#[tokio::test]
async fn test_tenant_isolation() {
    let dir = tempdir().unwrap();
    let f = sqlite_fixture(&dir).await;
    let doc = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();

    let other = RequestContext::new("alice", "globex");

    assert!(matches!(
        f.service.get_document(&other, doc.id).await,
        Err(RegistryError::DocumentNotFound(_))
    ));
    assert!(matches!(
        f.service.list_versions(&other, doc.id).await,
        Err(RegistryError::DocumentNotFound(_))
    ));
    assert!(matches!(
        f.service.get_version(&other, doc.id, 1).await,
        Err(RegistryError::DocumentNotFound(_))
    ));
    assert!(matches!(
        f.service
            .list_documents(&other, f.project_id, &DocumentFilter::default())
            .await,
        Err(RegistryError::ProjectNotFound(_))
    ));
}

#[tokio::test]
async fn test_default_content_not_shared_between_documents() {
    let f = fixture(Arc::new(MemoryStorage::new())).await;
    let a = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();
    let b = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();

    f.service
        .update_document(
            &f.owner,
            a.id,
            UpdateDocument {
                content: Some(json!({ "overview": "only a" })),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let b_now = f.service.get_document(&f.owner, b.id).await.unwrap();
    assert_eq!(b_now.document.content, b.content);
    assert_eq!(
        templates::get_default_content(TemplateType::ProjectPlan)["overview"],
        json!("")
    );
}

#[tokio::test]
async fn test_clone_and_delete() {
    let dir = tempdir().unwrap();
    let f = sqlite_fixture(&dir).await;
    let source = f
        .service
        .create_document(&f.owner, f.project_id, plan())
        .await
        .unwrap();
    f.service
        .update_document(
            &f.owner,
            source.id,
            UpdateDocument {
                content: Some(json!({ "overview": "v2" })),
                status: Some(DocumentStatus::Approved),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let clone = f
        .service
        .clone_document(&f.owner, source.id, CloneDocument::default())
        .await
        .unwrap();
    assert_ne!(clone.id, source.id);
    assert_eq!(clone.name, "Delivery plan (Copy)");
    assert_eq!(clone.version, 1);
    assert_eq!(clone.status, DocumentStatus::Draft);
    assert_eq!(clone.content, json!({ "overview": "v2" }));
    assert!(f.service.list_versions(&f.owner, clone.id).await.unwrap().is_empty());

    f.service.delete_document(&f.owner, source.id).await.unwrap();
    assert!(matches!(
        f.service.get_document(&f.owner, source.id).await,
        Err(RegistryError::DocumentNotFound(_))
    ));
    assert!(
        f.service
            .store()
            .list_versions(source.id, None)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(f.service.get_document(&f.owner, clone.id).await.is_ok());
}

#[tokio::test]
async fn test_list_filters_and_order() {
    let f = fixture(Arc::new(MemoryStorage::new())).await;
    let make = |template_type, name: &str| CreateDocument {
        template_type,
        name: name.to_string(),
        description: None,
        content: None,
    };

    let card = f
        .service
        .create_document(&f.owner, f.project_id, make(TemplateType::ModelCard, "Scoring model"))
        .await
        .unwrap();
    let risks = f
        .service
        .create_document(&f.owner, f.project_id, make(TemplateType::RiskRegister, "Risks"))
        .await
        .unwrap();
    let change = f
        .service
        .create_document(&f.owner, f.project_id, make(TemplateType::ChangeRequest, "CR-1 scope"))
        .await
        .unwrap();
    let status = f
        .service
        .create_document(&f.owner, f.project_id, make(TemplateType::StatusReport, "Weekly"))
        .await
        .unwrap();

    let all = f
        .service
        .list_documents(&f.owner, f.project_id, &DocumentFilter::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|d| d.id).collect();
    // Core first (newest first), then lifecycle, then AI-specific
    assert_eq!(ids, vec![status.id, risks.id, change.id, card.id]);

    let search = DocumentFilter {
        search: Some("SCO".to_string()),
        ..Default::default()
    };
    let found = f
        .service
        .list_documents(&f.owner, f.project_id, &search)
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![change.id, card.id]);

    let by_type = DocumentFilter {
        template_type: Some(TemplateType::RiskRegister),
        ..Default::default()
    };
    let found = f
        .service
        .list_documents(&f.owner, f.project_id, &by_type)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, risks.id);
}
