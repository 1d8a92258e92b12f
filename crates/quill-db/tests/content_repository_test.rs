//! Integration tests for content type, content entry, and API key
//! repositories using in-memory SurrealDB.

use quill_core::error::QuillError;
use quill_core::models::api_key::CreateApiKey;
use quill_core::models::content_entry::{CreateContentEntry, EntryFilter};
use quill_core::models::content_type::{CreateContentType, UpdateContentType};
use quill_core::models::document::Document;
use quill_core::repository::{
    ApiKeyRepository, ContentEntryRepository, ContentTypeRepository, PageRequest,
};
use quill_db::Repositories;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Repositories<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    quill_db::run_migrations(&db).await.unwrap();
    Repositories::new(db)
}

fn doc(value: serde_json::Value) -> Document {
    Document::new(value).unwrap()
}

async fn new_type(repos: &Repositories<Db>, tenant_id: Uuid, name: &str) -> Uuid {
    repos
        .content_types
        .create(CreateContentType {
            tenant_id,
            name: name.into(),
            schema: doc(json!({"title": "string"})),
        })
        .await
        .unwrap()
        .id
}

async fn new_entry(
    repos: &Repositories<Db>,
    tenant_id: Uuid,
    type_id: Uuid,
    data: serde_json::Value,
) -> Uuid {
    repos
        .content_entries
        .create(CreateContentEntry {
            tenant_id,
            content_type_id: type_id,
            data: doc(data),
        })
        .await
        .unwrap()
        .id
}

// -----------------------------------------------------------------------
// Content types
// -----------------------------------------------------------------------

#[tokio::test]
async fn duplicate_type_name_conflicts_only_within_a_tenant() {
    let repos = setup().await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

    new_type(&repos, a, "Product").await;
    new_type(&repos, b, "Product").await;

    let err = repos
        .content_types
        .create(CreateContentType {
            tenant_id: a,
            name: "Product".into(),
            schema: doc(json!({})),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, QuillError::Conflict { .. }), "got {err:?}");

    assert!(repos.content_types.name_taken(a, "Product", None).await.unwrap());
    assert!(!repos.content_types.name_taken(a, "Article", None).await.unwrap());
}

#[tokio::test]
async fn name_taken_excludes_the_row_itself() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let id = new_type(&repos, tenant, "Product").await;

    assert!(!repos.content_types.name_taken(tenant, "Product", Some(id)).await.unwrap());
}

#[tokio::test]
async fn type_reads_are_tenant_scoped() {
    let repos = setup().await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
    let id = new_type(&repos, a, "Product").await;

    assert!(matches!(
        repos.content_types.get_by_id(b, id).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        repos
            .content_types
            .update(
                b,
                id,
                UpdateContentType {
                    name: "Stolen".into(),
                    schema: doc(json!({}))
                }
            )
            .await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        repos.content_types.delete(b, id).await,
        Err(QuillError::NotFound { .. })
    ));

    assert_eq!(repos.content_types.get_by_id(a, id).await.unwrap().name, "Product");
    assert!(repos.content_types.list(b).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_by_name_ignores_case() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let id = new_type(&repos, tenant, "Product").await;

    assert_eq!(repos.content_types.get_by_name(tenant, "pRoDuCt").await.unwrap().id, id);
    assert!(repos.content_types.get_by_name(Uuid::now_v7(), "product").await.is_err());
}

#[tokio::test]
async fn update_changes_name_and_schema() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let id = new_type(&repos, tenant, "Product").await;

    let updated = repos
        .content_types
        .update(
            tenant,
            id,
            UpdateContentType {
                name: "Item".into(),
                schema: doc(json!({"sku": "string"})),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Item");
    assert_eq!(updated.schema.as_value(), &json!({"sku": "string"}));
}

#[tokio::test]
async fn deleting_a_type_removes_its_entries() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let doomed = new_type(&repos, tenant, "Product").await;
    let kept = new_type(&repos, tenant, "Article").await;
    new_entry(&repos, tenant, doomed, json!({"n": 1})).await;
    new_entry(&repos, tenant, kept, json!({"n": 2})).await;

    repos.content_types.delete(tenant, doomed).await.unwrap();

    assert_eq!(repos.content_types.count(tenant).await.unwrap(), 1);
    assert_eq!(repos.content_entries.count(tenant).await.unwrap(), 1);
}

// -----------------------------------------------------------------------
// Content entries
// -----------------------------------------------------------------------

#[tokio::test]
async fn entries_start_visible_and_toggle_back() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let type_id = new_type(&repos, tenant, "Product").await;
    let id = new_entry(&repos, tenant, type_id, json!({"name": "Book"})).await;

    assert!(repos.content_entries.get_by_id(tenant, id).await.unwrap().is_visible);
    assert!(!repos.content_entries.toggle_visibility(tenant, id).await.unwrap().is_visible);
    assert!(repos.content_entries.toggle_visibility(tenant, id).await.unwrap().is_visible);
}

#[tokio::test]
async fn entry_writes_are_tenant_scoped() {
    let repos = setup().await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
    let type_id = new_type(&repos, a, "Product").await;
    let id = new_entry(&repos, a, type_id, json!({"name": "Book"})).await;

    assert!(matches!(
        repos.content_entries.get_by_id(b, id).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        repos.content_entries.update_data(b, id, doc(json!({"x": 1}))).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        repos.content_entries.toggle_visibility(b, id).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        repos.content_entries.delete(b, id).await,
        Err(QuillError::NotFound { .. })
    ));

    let entry = repos.content_entries.get_by_id(a, id).await.unwrap();
    assert_eq!(entry.data.as_value(), &json!({"name": "Book"}));
    assert!(entry.is_visible);
}

#[tokio::test]
async fn update_data_leaves_type_and_visibility() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let type_id = new_type(&repos, tenant, "Product").await;
    let id = new_entry(&repos, tenant, type_id, json!({"name": "Book"})).await;
    repos.content_entries.toggle_visibility(tenant, id).await.unwrap();

    let updated = repos
        .content_entries
        .update_data(tenant, id, doc(json!({"name": "Pen"})))
        .await
        .unwrap();
    assert_eq!(updated.content_type_id, type_id);
    assert!(!updated.is_visible);
    assert_eq!(updated.data.as_value(), &json!({"name": "Pen"}));
}

#[tokio::test]
async fn listing_paginates_newest_first() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let type_id = new_type(&repos, tenant, "Product").await;
    let mut ids = Vec::new();
    for n in 0..23 {
        ids.push(new_entry(&repos, tenant, type_id, json!({"n": n})).await);
    }

    let first = repos
        .content_entries
        .list_by_type(tenant, type_id, &EntryFilter::default(), PageRequest::new(1, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(first.total_records, 23);
    assert_eq!(first.total_pages, 5);
    assert_eq!(first.items[0].id, ids[22]);

    let last = repos
        .content_entries
        .list_by_type(tenant, type_id, &EntryFilter::default(), PageRequest::new(5, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(last.items.len(), 3);
    assert_eq!(last.items[2].id, ids[0]);

    let beyond = repos
        .content_entries
        .list_by_type(tenant, type_id, &EntryFilter::default(), PageRequest::new(9, 5).unwrap())
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_records, 23);
}

#[tokio::test]
async fn search_counts_after_filtering() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let type_id = new_type(&repos, tenant, "Product").await;
    for name in ["Blue Book", "Red book", "Pen", "Notebook", "Stapler"] {
        new_entry(&repos, tenant, type_id, json!({"name": name})).await;
    }

    let page = repos
        .content_entries
        .list_by_type(
            tenant,
            type_id,
            &EntryFilter::search(Some("BOOK")),
            PageRequest::new(1, 2).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_records, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn visible_filter_hides_toggled_entries() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let type_id = new_type(&repos, tenant, "Product").await;
    let hidden = new_entry(&repos, tenant, type_id, json!({"name": "Book"})).await;
    new_entry(&repos, tenant, type_id, json!({"name": "Book two"})).await;
    repos.content_entries.toggle_visibility(tenant, hidden).await.unwrap();

    let plain = repos
        .content_entries
        .list_by_type(tenant, type_id, &EntryFilter::default().visible(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(plain.total_records, 1);

    let searched = repos
        .content_entries
        .list_by_type(
            tenant,
            type_id,
            &EntryFilter::search(Some("book")).visible(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(searched.total_records, 1);
    assert_ne!(searched.items[0].id, hidden);
}

#[tokio::test]
async fn recent_returns_newest_across_types() {
    let repos = setup().await;
    let tenant = Uuid::now_v7();
    let products = new_type(&repos, tenant, "Product").await;
    let articles = new_type(&repos, tenant, "Article").await;
    new_entry(&repos, tenant, products, json!({"n": 1})).await;
    new_entry(&repos, tenant, articles, json!({"n": 2})).await;
    let newest = new_entry(&repos, tenant, products, json!({"n": 3})).await;

    let recent = repos.content_entries.recent(tenant, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, newest);
    assert_eq!(recent[1].content_type_id, articles);
}

// -----------------------------------------------------------------------
// API keys
// -----------------------------------------------------------------------

#[tokio::test]
async fn api_keys_are_unique_per_tenant_and_found_by_hash() {
    let repos = setup().await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
    let create = |tenant_id, name: &str, hash: &str| CreateApiKey {
        tenant_id,
        name: name.into(),
        key_hash: hash.into(),
    };

    let key = repos.api_keys.create(create(a, "ci", "h1")).await.unwrap();
    repos.api_keys.create(create(b, "ci", "h2")).await.unwrap();

    let err = repos.api_keys.create(create(a, "ci", "h3")).await.unwrap_err();
    assert!(matches!(err, QuillError::Conflict { .. }));
    assert!(repos.api_keys.name_exists(a, "ci").await.unwrap());

    let found = repos.api_keys.get_by_hash("h1").await.unwrap();
    assert_eq!(found.id, key.id);
    assert_eq!(found.tenant_id, a);
    assert!(repos.api_keys.get_by_hash("nope").await.is_err());
}

#[tokio::test]
async fn api_key_delete_is_tenant_scoped() {
    let repos = setup().await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
    let key = repos
        .api_keys
        .create(CreateApiKey {
            tenant_id: a,
            name: "ci".into(),
            key_hash: "h1".into(),
        })
        .await
        .unwrap();

    assert!(matches!(
        repos.api_keys.delete(b, key.id).await,
        Err(QuillError::NotFound { .. })
    ));
    assert_eq!(repos.api_keys.count(a).await.unwrap(), 1);

    repos.api_keys.delete(a, key.id).await.unwrap();
    assert!(repos.api_keys.list(a).await.unwrap().is_empty());
}
