// tests/http_tests.rs

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bazaar::{Actions, MemoryStore, Role, User, UserDraft};
use bazaar_admin::config::AppConfig;
use bazaar_admin::state::AppState;
use bazaar_admin::web::configure_app_routes;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use serial_test::serial;
use std::sync::Arc;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
  tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
});

struct Harness {
  store: Arc<MemoryStore>,
  state: AppState,
  admin: User,
  alice: User,
  bob: User,
}

async fn user(actions: &Actions, name: &str, nni: &str, role: Role) -> User {
  actions
    .create_user(UserDraft {
      name: name.to_string(),
      nni: nni.to_string(),
      password: "password123".to_string(),
      role,
      photo: None,
    })
    .await
    .expect("harness user")
}

impl Harness {
  async fn new() -> Self {
    Lazy::force(&TRACING);
    let store = Arc::new(MemoryStore::new());
    let actions = Arc::new(Actions::new(store.clone()));
    let admin = user(&actions, "Admin", "20000000", Role::Admin).await;
    let alice = user(&actions, "Alice", "22110001", Role::User).await;
    let bob = user(&actions, "Bob", "22110002", Role::User).await;
    let config = AppConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| "postgres://unused".to_string()))
      .expect("test config");

    Self {
      store,
      state: AppState {
        db_pool: None,
        actions,
        config: Arc::new(config),
      },
      admin,
      alice,
      bob,
    }
  }
}

macro_rules! app {
  ($harness:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($harness.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn as_user(req: test::TestRequest, id: Uuid) -> test::TestRequest {
  req.insert_header(("X-User-ID", id.to_string()))
}

fn chaise() -> Value {
  json!({ "name": "Chaise", "quantity": 10, "price_v": 500.0 })
}

#[actix_rt::test]
#[serial]
async fn health_reports_in_memory_store() {
  let h = Harness::new().await;
  let app = app!(h);

  let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(body["status"], "ok");
  assert_eq!(body["database"], "in-memory");
}

#[actix_rt::test]
#[serial]
async fn requests_without_a_known_caller_are_unauthorized() {
  let h = Harness::new().await;
  let app = app!(h);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let req = as_user(test::TestRequest::get().uri("/api/v1/products"), Uuid::new_v4()).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::get()
    .uri("/api/v1/products")
    .insert_header(("X-User-ID", "not-a-uuid"))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
#[serial]
async fn user_administration_is_admin_only() {
  let h = Harness::new().await;
  let app = app!(h);

  let req = as_user(test::TestRequest::get().uri("/api/v1/users"), h.alice.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let req = as_user(test::TestRequest::patch().uri(&format!("/api/v1/users/{}", h.bob.id)), h.alice.id)
    .set_json(json!({ "role": "ADMIN" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let req = as_user(test::TestRequest::get().uri("/api/v1/users"), h.admin.id).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["users"].as_array().map(Vec::len), Some(3));
}

#[actix_rt::test]
#[serial]
async fn admin_updates_and_deletes_users() {
  let h = Harness::new().await;
  let app = app!(h);

  let req = as_user(test::TestRequest::patch().uri(&format!("/api/v1/users/{}", h.bob.id)), h.admin.id)
    .set_json(json!({ "name": "Robert" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = as_user(test::TestRequest::delete().uri(&format!("/api/v1/users/{}", h.alice.id)), h.admin.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = as_user(test::TestRequest::get().uri("/api/v1/users"), h.admin.id).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let users = body["users"].as_array().cloned().unwrap_or_default();
  assert_eq!(users.len(), 2);
  assert!(users.iter().any(|u| u["name"] == "Robert"));
  assert!(users.iter().all(|u| u["id"] != h.alice.id.to_string()));

  let req = as_user(test::TestRequest::delete().uri(&format!("/api/v1/users/{}", h.alice.id)), h.admin.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn users_page_filters_by_nni() {
  let h = Harness::new().await;
  let app = app!(h);

  let req = as_user(test::TestRequest::get().uri("/api/v1/users/page?page=1&q=2211"), h.admin.id).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["total"], 2);
  assert_eq!(body["perPage"], 6);
  assert_eq!(body["totalPages"], 1);
}

#[actix_rt::test]
#[serial]
async fn product_lifecycle_respects_ownership() {
  let h = Harness::new().await;
  let app = app!(h);

  let req = as_user(test::TestRequest::post().uri("/api/v1/products"), h.alice.id)
    .set_json(chaise())
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  let product_id = body["product"]["id"].as_str().unwrap_or_default().to_string();
  assert_eq!(body["product"]["userId"], h.alice.id.to_string());

  let patch_uri = format!("/api/v1/products/{}", product_id);
  let req = as_user(test::TestRequest::patch().uri(&patch_uri), h.bob.id)
    .set_json(json!({ "quantity": 3 }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let req = as_user(test::TestRequest::patch().uri(&patch_uri), h.admin.id)
    .set_json(json!({ "quantity": 3 }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = as_user(test::TestRequest::get().uri(&patch_uri), h.bob.id).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["product"]["quantity"], 3);
  assert_eq!(body["product"]["user"]["name"], "Alice");

  let req = as_user(test::TestRequest::delete().uri(&patch_uri), h.alice.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = as_user(test::TestRequest::get().uri(&patch_uri), h.alice.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn invalid_products_are_rejected() {
  let h = Harness::new().await;
  let app = app!(h);

  for payload in [
    json!({ "name": "", "quantity": 1, "price_v": 10.0 }),
    json!({ "name": "Lampe", "quantity": -1, "price_v": 10.0 }),
    json!({ "name": "Lampe", "quantity": 1, "price_v": 0.0 }),
  ] {
    let req = as_user(test::TestRequest::post().uri("/api/v1/products"), h.alice.id)
      .set_json(payload)
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
  }
}

#[actix_rt::test]
#[serial]
async fn orphaned_products_list_with_placeholder_owner() {
  let h = Harness::new().await;
  let app = app!(h);

  let req = as_user(test::TestRequest::post().uri("/api/v1/products"), h.bob.id)
    .set_json(chaise())
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

  let req = as_user(test::TestRequest::delete().uri(&format!("/api/v1/users/{}", h.bob.id)), h.admin.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = as_user(test::TestRequest::get().uri("/api/v1/products"), h.alice.id).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["products"][0]["user"]["name"], "User Name");
  assert_eq!(body["products"][0]["user"]["nni"], "User NNI");
}

#[actix_rt::test]
#[serial]
async fn products_page_searches_names_case_insensitively() {
  let h = Harness::new().await;
  let app = app!(h);

  for name in ["Chaise", "Table", "Chaise longue"] {
    let req = as_user(test::TestRequest::post().uri("/api/v1/products"), h.alice.id)
      .set_json(json!({ "name": name, "quantity": 1, "price_v": 20.0 }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
  }

  let req = as_user(test::TestRequest::get().uri("/api/v1/products/page?q=chaise"), h.alice.id).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["total"], 2);
  assert_eq!(body["page"], 1);
}

#[actix_rt::test]
#[serial]
async fn store_outage_maps_to_service_unavailable() {
  let h = Harness::new().await;
  let app = app!(h);
  h.store.set_available(false);

  let req = as_user(test::TestRequest::get().uri("/api/v1/products"), h.alice.id).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SERVICE_UNAVAILABLE);
}
