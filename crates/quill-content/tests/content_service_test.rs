//! Content services against in-memory SurrealDB with resolved principals.

use quill_content::{
    ContentEntryService, ContentTypeInput, ContentTypeService, DashboardService, DeliveryService,
    ListQuery,
};
use quill_core::error::QuillError;
use quill_core::models::api_key::CreateApiKey;
use quill_core::models::principal::Principal;
use quill_core::models::tenant::{CreateTenant, SubscriptionPlan};
use quill_core::models::user::UserRole;
use quill_core::repository::{ApiKeyRepository, TenantRepository};
use quill_db::Repositories;
use quill_db::repository::{
    SurrealApiKeyRepository, SurrealContentEntryRepository, SurrealContentTypeRepository,
    SurrealTenantRepository,
};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Tenants = SurrealTenantRepository<Db>;
type Types = SurrealContentTypeRepository<Db>;
type Entries = SurrealContentEntryRepository<Db>;

struct Harness {
    repos: Repositories<Db>,
    types: ContentTypeService<Tenants, Types>,
    entries: ContentEntryService<Tenants, Types, Entries>,
    delivery: DeliveryService<Types, Entries>,
    dashboard: DashboardService<Types, Entries, SurrealApiKeyRepository<Db>>,
}

async fn setup() -> Harness {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    quill_db::run_migrations(&db).await.unwrap();
    let repos = Repositories::new(db);

    Harness {
        types: ContentTypeService::new(repos.tenants.clone(), repos.content_types.clone()),
        entries: ContentEntryService::new(
            repos.tenants.clone(),
            repos.content_types.clone(),
            repos.content_entries.clone(),
        ),
        delivery: DeliveryService::new(repos.content_types.clone(), repos.content_entries.clone()),
        dashboard: DashboardService::new(
            repos.content_types.clone(),
            repos.content_entries.clone(),
            repos.api_keys.clone(),
        ),
        repos,
    }
}

impl Harness {
    async fn tenant(&self) -> Uuid {
        self.repos
            .tenants
            .create(CreateTenant {
                name: format!("tenant-{}", Uuid::now_v7()),
                plan: SubscriptionPlan::Free,
            })
            .await
            .unwrap()
            .id
    }
}

fn admin(tenant_id: Uuid) -> Principal {
    Principal::user(tenant_id, Uuid::now_v7(), UserRole::Admin)
}

fn product() -> ContentTypeInput {
    ContentTypeInput::new("Product", json!({"name": "string", "price": "number"}))
}

#[tokio::test]
async fn tenants_cannot_touch_each_others_content() {
    let h = setup().await;
    let (a, b) = (admin(h.tenant().await), admin(h.tenant().await));

    let ty = h.types.create_type(&a, product()).await.unwrap();
    let entry = h
        .entries
        .create_entry(&a, ty.id, Some(json!({"name": "Book"})))
        .await
        .unwrap();

    assert!(matches!(h.types.get_type(&b, ty.id).await, Err(QuillError::NotFound { .. })));
    assert!(matches!(
        h.types.update_type(&b, ty.id, ContentTypeInput::new("Mine", json!({}))).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(h.types.delete_type(&b, ty.id).await, Err(QuillError::NotFound { .. })));
    assert!(matches!(
        h.entries.create_entry(&b, ty.id, Some(json!({"x": 1}))).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(h.entries.get_entry(&b, entry.id).await, Err(QuillError::NotFound { .. })));
    assert!(matches!(
        h.entries.update_entry(&b, entry.id, Some(json!({"x": 1}))).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        h.entries.toggle_visibility(&b, entry.id).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(h.entries.delete_entry(&b, entry.id).await, Err(QuillError::NotFound { .. })));
    assert_eq!(
        h.entries
            .list_entries(&b, ty.id, &ListQuery::default())
            .await
            .unwrap()
            .total_records,
        0
    );

    let untouched = h.entries.get_entry(&a, entry.id).await.unwrap();
    assert!(untouched.is_visible);
    assert_eq!(untouched.data.as_value(), &json!({"name": "Book"}));
}

#[tokio::test]
async fn type_names_are_unique_per_tenant() {
    let h = setup().await;
    let (a, b) = (admin(h.tenant().await), admin(h.tenant().await));

    h.types.create_type(&a, product()).await.unwrap();
    h.types.create_type(&b, product()).await.unwrap();
    assert!(matches!(
        h.types.create_type(&a, product()).await,
        Err(QuillError::Conflict { .. })
    ));

    let article = h
        .types
        .create_type(&a, ContentTypeInput::new("Article", json!({})))
        .await
        .unwrap();
    assert!(matches!(
        h.types.update_type(&a, article.id, product()).await,
        Err(QuillError::Conflict { .. })
    ));
    // Renaming to its own name is fine.
    let kept = h
        .types
        .update_type(&a, article.id, ContentTypeInput::new("Article", json!({"body": "text"})))
        .await
        .unwrap();
    assert_eq!(kept.schema.as_value(), &json!({"body": "text"}));
    assert_eq!(h.types.get_all_types(&a).await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let h = setup().await;
    let a = admin(h.tenant().await);
    let ty = h.types.create_type(&a, product()).await.unwrap();

    assert!(matches!(
        h.types.create_type(&a, ContentTypeInput::new("", json!({}))).await,
        Err(QuillError::Validation { .. })
    ));
    assert!(matches!(
        h.entries.create_entry(&a, ty.id, None).await,
        Err(QuillError::Validation { .. })
    ));
    assert!(matches!(
        h.entries.list_entries(&a, ty.id, &ListQuery::page(0, 10)).await,
        Err(QuillError::Validation { .. })
    ));
}

#[tokio::test]
async fn roles_gate_writes() {
    let h = setup().await;
    let tenant = h.tenant().await;
    let a = admin(tenant);
    let ty = h.types.create_type(&a, product()).await.unwrap();

    let user = Principal::user(tenant, Uuid::now_v7(), UserRole::User);
    assert!(matches!(
        h.types.create_type(&user, ContentTypeInput::new("Other", json!({}))).await,
        Err(QuillError::Forbidden { .. })
    ));
    h.entries
        .create_entry(&user, ty.id, Some(json!({"name": "Pen"})))
        .await
        .unwrap();

    let machine = Principal::api_key(tenant, Uuid::now_v7());
    assert!(matches!(
        h.entries.create_entry(&machine, ty.id, Some(json!({}))).await,
        Err(QuillError::Forbidden { .. })
    ));
    assert!(matches!(
        h.entries.list_entries(&machine, ty.id, &ListQuery::default()).await,
        Err(QuillError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn listing_paginates_and_searches() {
    let h = setup().await;
    let a = admin(h.tenant().await);
    let ty = h.types.create_type(&a, product()).await.unwrap();
    for n in 0..12 {
        let name = if n % 3 == 0 { format!("Book {n}") } else { format!("Pen {n}") };
        h.entries
            .create_entry(&a, ty.id, Some(json!({"name": name})))
            .await
            .unwrap();
    }

    let last = h.entries.list_entries(&a, ty.id, &ListQuery::page(3, 5)).await.unwrap();
    assert_eq!(last.total_records, 12);
    assert_eq!(last.total_pages, 3);
    assert_eq!(last.items.len(), 2);

    let books = h
        .entries
        .list_entries(&a, ty.id, &ListQuery::page(1, 3).search("book"))
        .await
        .unwrap();
    assert_eq!(books.total_records, 4);
    assert_eq!(books.total_pages, 2);
    assert_eq!(books.items[0].data.as_value(), &json!({"name": "Book 9"}));
}

#[tokio::test]
async fn two_toggles_restore_visibility() {
    let h = setup().await;
    let a = admin(h.tenant().await);
    let ty = h.types.create_type(&a, product()).await.unwrap();
    let entry = h.entries.create_entry(&a, ty.id, Some(json!({}))).await.unwrap();

    let once = h.entries.toggle_visibility(&a, entry.id).await.unwrap();
    let twice = h.entries.toggle_visibility(&a, entry.id).await.unwrap();
    assert_eq!(once.is_visible, !entry.is_visible);
    assert_eq!(twice.is_visible, entry.is_visible);
}

#[tokio::test]
async fn delivery_serves_visible_entries_by_type_name() {
    let h = setup().await;
    let tenant = h.tenant().await;
    let a = admin(tenant);
    let ty = h.types.create_type(&a, product()).await.unwrap();
    let hidden = h
        .entries
        .create_entry(&a, ty.id, Some(json!({"name": "Secret book"})))
        .await
        .unwrap();
    h.entries
        .create_entry(&a, ty.id, Some(json!({"name": "Public book"})))
        .await
        .unwrap();
    h.entries.toggle_visibility(&a, hidden.id).await.unwrap();

    let machine = Principal::api_key(tenant, Uuid::now_v7());
    let page = h
        .delivery
        .fetch(&machine, "pRODUCT", &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total_records, 1);
    assert!(page.items.iter().all(|e| e.is_visible));

    let searched = h
        .delivery
        .fetch(&machine, "product", &ListQuery::default().search("secret"))
        .await
        .unwrap();
    assert_eq!(searched.total_records, 0);

    let other = Principal::api_key(Uuid::now_v7(), Uuid::now_v7());
    assert!(matches!(
        h.delivery.fetch(&other, "Product", &ListQuery::default()).await,
        Err(QuillError::NotFound { .. })
    ));
}

#[tokio::test]
async fn deleting_a_type_removes_its_entries() {
    let h = setup().await;
    let a = admin(h.tenant().await);
    let ty = h.types.create_type(&a, product()).await.unwrap();
    let entry = h.entries.create_entry(&a, ty.id, Some(json!({}))).await.unwrap();

    h.types.delete_type(&a, ty.id).await.unwrap();
    assert!(matches!(h.entries.get_entry(&a, entry.id).await, Err(QuillError::NotFound { .. })));
}

#[tokio::test]
async fn dashboard_counts_and_recent_entries() {
    let h = setup().await;
    let tenant = h.tenant().await;
    let a = admin(tenant);
    let products = h.types.create_type(&a, product()).await.unwrap();
    let articles = h
        .types
        .create_type(&a, ContentTypeInput::new("Article", json!({})))
        .await
        .unwrap();
    for n in 0..11 {
        h.entries
            .create_entry(&a, products.id, Some(json!({"n": n})))
            .await
            .unwrap();
    }
    let newest = h.entries.create_entry(&a, articles.id, Some(json!({}))).await.unwrap();
    h.repos
        .api_keys
        .create(CreateApiKey {
            tenant_id: tenant,
            name: "site".into(),
            key_hash: "hash".into(),
        })
        .await
        .unwrap();

    // Noise in another tenant.
    let b = admin(h.tenant().await);
    h.types.create_type(&b, product()).await.unwrap();

    let stats = h.dashboard.stats(&Principal::api_key(tenant, Uuid::now_v7())).await.unwrap();
    assert_eq!(stats.total_content_types, 2);
    assert_eq!(stats.total_entries, 12);
    assert_eq!(stats.total_api_keys, 1);
    assert_eq!(stats.recent_entries.len(), 10);
    assert_eq!(stats.recent_entries[0].id, newest.id);
    assert_eq!(stats.recent_entries[0].type_name, "Article");
    assert_eq!(stats.recent_entries[1].type_name, "Product");
}

#[tokio::test]
async fn writes_fail_once_the_tenant_is_deleted() {
    let h = setup().await;
    let tenant = h.tenant().await;
    let a = admin(tenant);
    let ty = h.types.create_type(&a, product()).await.unwrap();

    h.repos.tenants.delete(tenant).await.unwrap();

    assert!(matches!(
        h.types.create_type(&a, ContentTypeInput::new("Article", json!({}))).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(matches!(
        h.entries.create_entry(&a, ty.id, Some(json!({"name": "Book"}))).await,
        Err(QuillError::NotFound { .. })
    ));
    assert!(h.types.get_all_types(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_tenant_cannot_create_types() {
    let h = setup().await;
    let ghost = admin(Uuid::now_v7());
    assert!(matches!(
        h.types.create_type(&ghost, product()).await,
        Err(QuillError::NotFound { .. })
    ));
}
