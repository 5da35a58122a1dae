// tests/action_layer_tests.rs
mod common;

use bazaar::passwords::verify_password;
use bazaar::{
  ActionError, ActionLayer, Actor, OwnerSummary, PageRequest, ProductDraft, ProductPatch, Role, UserDraft, UserPatch,
};
use common::*;
use serial_test::serial;
use uuid::Uuid;

fn chaise() -> ProductDraft {
  ProductDraft {
    name: "Chaise".to_string(),
    quantity: 10,
    price_v: 500.0,
    image_url: None,
  }
}

fn admin_actor(fx: &Fixture) -> Actor {
  Actor::new(fx.admin.id, Role::Admin)
}

#[tokio::test]
#[serial]
async fn test_update_user_changes_only_supplied_field() {
  setup_tracing();
  let fx = Fixture::new().await;

  let patch = UserPatch {
    name: Some("Alice B.".to_string()),
    ..Default::default()
  };
  fx.actions.update_user(&admin_actor(&fx), fx.alice.id, patch).await.unwrap();

  let users = fx.actions.get_all_users().await.unwrap();
  let alice = users.iter().find(|u| u.id == fx.alice.id).unwrap();
  assert_eq!(alice.name, "Alice B.");
  assert_eq!(alice.nni, fx.alice.nni);
  assert_eq!(alice.role, Role::User);
  assert_eq!(users.len(), 3);
}

#[tokio::test]
#[serial]
async fn test_update_user_hashes_new_password() {
  setup_tracing();
  let fx = Fixture::new().await;
  let patch = UserPatch {
    password: Some("brand-new-pass".to_string()),
    ..Default::default()
  };
  fx.actions.update_user(&admin_actor(&fx), fx.bob.id, patch).await.unwrap();

  let stored = fx.store.password_hash(fx.bob.id).unwrap();
  assert_ne!(stored, "brand-new-pass");
  assert!(verify_password(&stored, "brand-new-pass").unwrap());
}

#[tokio::test]
#[serial]
async fn test_user_management_requires_admin() {
  setup_tracing();
  let fx = Fixture::new().await;
  let alice = Actor::new(fx.alice.id, Role::User);

  let promote = UserPatch {
    role: Some(Role::Admin),
    ..Default::default()
  };
  let err = fx.actions.update_user(&alice, fx.alice.id, promote).await.unwrap_err();
  assert!(matches!(err, ActionError::Forbidden(_)));

  let err = fx.actions.delete_user(&alice, fx.bob.id).await.unwrap_err();
  assert!(matches!(err, ActionError::Forbidden(_)));
  assert_eq!(fx.actions.get_all_users().await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn test_unknown_user_is_not_found() {
  setup_tracing();
  let fx = Fixture::new().await;
  let patch = UserPatch {
    name: Some("Ghost".to_string()),
    ..Default::default()
  };
  let err = fx.actions.update_user(&admin_actor(&fx), Uuid::new_v4(), patch).await.unwrap_err();
  assert!(matches!(err, ActionError::NotFound(_)));

  let err = fx.actions.delete_user(&admin_actor(&fx), Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, ActionError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_create_user_rules() {
  setup_tracing();
  let fx = Fixture::new().await;

  let duplicate = UserDraft {
    name: "Other".to_string(),
    nni: fx.alice.nni.clone(),
    password: "longenough".to_string(),
    role: Role::User,
    photo: None,
  };
  assert!(matches!(fx.actions.create_user(duplicate).await, Err(ActionError::Validation(_))));

  let short = UserDraft {
    name: "Short".to_string(),
    nni: "22999999".to_string(),
    password: "12345".to_string(),
    role: Role::User,
    photo: None,
  };
  assert!(matches!(fx.actions.create_user(short).await, Err(ActionError::Validation(_))));
  assert_eq!(fx.actions.get_all_users().await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn test_chaise_scenario() {
  setup_tracing();
  let fx = Fixture::new().await;

  let product = fx.actions.create_product(chaise(), fx.alice.id).await.unwrap();
  let listings = fx.actions.get_products().await.unwrap();
  assert_eq!(listings.len(), 1);
  assert_eq!(listings[0].product.name, "Chaise");
  assert_eq!(listings[0].user.name, "Alice");

  let err = fx
    .actions
    .delete_product(product.id, fx.bob.id, Role::User)
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::Forbidden(_)));
  assert_eq!(fx.actions.get_products().await.unwrap().len(), 1);

  fx.actions.delete_product(product.id, fx.admin.id, Role::Admin).await.unwrap();
  assert!(fx.actions.get_products().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_forbidden_update_leaves_record_unchanged() {
  setup_tracing();
  let fx = Fixture::new().await;
  let product = fx.actions.create_product(chaise(), fx.alice.id).await.unwrap();

  let patch = ProductPatch {
    price_v: Some(1.0),
    ..Default::default()
  };
  let err = fx
    .actions
    .update_product(product.id, patch.clone(), fx.bob.id, Role::User)
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::Forbidden(_)));
  assert_eq!(fx.actions.get_product(product.id).await.unwrap().product.price_v, 500.0);

  fx.actions.update_product(product.id, patch, fx.alice.id, Role::User).await.unwrap();
  assert_eq!(fx.actions.get_product(product.id).await.unwrap().product.price_v, 1.0);
}

#[tokio::test]
#[serial]
async fn test_non_owner_with_invalid_patch_is_forbidden() {
  setup_tracing();
  let fx = Fixture::new().await;
  let product = fx.actions.create_product(chaise(), fx.alice.id).await.unwrap();

  let patch = ProductPatch {
    price_v: Some(0.0),
    ..Default::default()
  };
  let err = fx
    .actions
    .update_product(product.id, patch.clone(), fx.bob.id, Role::User)
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::Forbidden(_)), "got {:?}", err);

  let err = fx
    .actions
    .update_product(product.id, patch, fx.alice.id, Role::User)
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::Validation(_)), "got {:?}", err);
  assert_eq!(fx.actions.get_product(product.id).await.unwrap().product.price_v, 500.0);
}

#[tokio::test]
#[serial]
async fn test_update_product_partial_and_image_clear() {
  setup_tracing();
  let fx = Fixture::new().await;
  let mut draft = chaise();
  draft.image_url = Some("https://cdn.example/chaise.jpg".to_string());
  let product = fx.actions.create_product(draft, fx.alice.id).await.unwrap();

  let patch = ProductPatch {
    quantity: Some(3),
    image_url: Some(String::new()),
    ..Default::default()
  };
  fx.actions.update_product(product.id, patch, fx.admin.id, Role::Admin).await.unwrap();

  let updated = fx.actions.get_product(product.id).await.unwrap().product;
  assert_eq!(updated.quantity, 3);
  assert_eq!(updated.name, "Chaise");
  assert_eq!(updated.image_url, None);
  assert_eq!(updated.user_id, fx.alice.id);
}

#[tokio::test]
#[serial]
async fn test_invalid_product_rejected_before_mutation() {
  setup_tracing();
  let fx = Fixture::new().await;

  let mut bad = chaise();
  bad.quantity = -1;
  assert!(matches!(
    fx.actions.create_product(bad, fx.alice.id).await,
    Err(ActionError::Validation(_))
  ));

  let mut bad = chaise();
  bad.price_v = 0.0;
  assert!(matches!(
    fx.actions.create_product(bad, fx.alice.id).await,
    Err(ActionError::Validation(_))
  ));
  assert!(fx.actions.get_products().await.unwrap().is_empty());

  assert!(matches!(
    fx.actions.create_product(chaise(), Uuid::new_v4()).await,
    Err(ActionError::NotFound(_))
  ));
}

#[tokio::test]
#[serial]
async fn test_missing_product_is_not_found() {
  setup_tracing();
  let fx = Fixture::new().await;
  let err = fx
    .actions
    .update_product(Uuid::new_v4(), ProductPatch::default(), fx.admin.id, Role::Admin)
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::NotFound(_)));
  let err = fx
    .actions
    .delete_product(Uuid::new_v4(), fx.admin.id, Role::Admin)
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_deleting_owner_leaves_orphan_with_placeholders() {
  setup_tracing();
  let fx = Fixture::new().await;
  fx.actions.create_product(chaise(), fx.bob.id).await.unwrap();

  fx.actions.delete_user(&admin_actor(&fx), fx.bob.id).await.unwrap();

  let listings = fx.actions.get_products().await.unwrap();
  assert_eq!(listings.len(), 1);
  assert_eq!(listings[0].user, OwnerSummary::placeholder());
  assert_eq!(listings[0].user.name, "User Name");
  assert_eq!(listings[0].user.nni, "User NNI");
}

#[tokio::test]
#[serial]
async fn test_store_outage_surfaces_as_unavailable() {
  setup_tracing();
  let fx = Fixture::new().await;
  fx.store.set_available(false);
  assert!(matches!(fx.actions.get_all_users().await, Err(ActionError::StoreUnavailable(_))));
  assert!(matches!(fx.actions.get_products().await, Err(ActionError::StoreUnavailable(_))));
}

#[tokio::test]
#[serial]
async fn test_resolve_actor_reads_role_from_store() {
  setup_tracing();
  let fx = Fixture::new().await;
  assert_eq!(fx.actions.resolve_actor(fx.admin.id).await.unwrap().role, Role::Admin);
  assert!(matches!(
    fx.actions.resolve_actor(Uuid::new_v4()).await,
    Err(ActionError::NotFound(_))
  ));
}

#[tokio::test]
#[serial]
async fn test_server_side_pages() {
  setup_tracing();
  let fx = Fixture::new().await;
  for i in 0..7 {
    let mut draft = chaise();
    draft.name = if i % 2 == 0 { format!("Chaise {}", i) } else { format!("Table {}", i) };
    fx.actions.create_product(draft, fx.alice.id).await.unwrap();
  }

  let first = fx.actions.get_products_page(&PageRequest::new(1, "")).await.unwrap();
  assert_eq!(first.items.len(), 5);
  assert_eq!(first.total, 7);
  assert_eq!(first.total_pages, 2);

  let second = fx.actions.get_products_page(&PageRequest::new(2, "")).await.unwrap();
  assert_eq!(second.items.len(), 2);

  let chairs = fx.actions.get_products_page(&PageRequest::new(1, "CHAISE")).await.unwrap();
  assert_eq!(chairs.total, 4);
  assert!(chairs.items.iter().all(|l| l.product.name.starts_with("Chaise")));

  let users = fx.actions.get_users_page(&PageRequest::new(1, "2211")).await.unwrap();
  assert_eq!(users.total, 2);
  assert_eq!(users.per_page, 6);
}

#[tokio::test]
#[serial]
async fn test_update_of_unknown_user_with_taken_nni_is_not_found() {
  setup_tracing();
  let fx = Fixture::new().await;
  let patch = UserPatch {
    nni: Some(fx.alice.nni.clone()),
    ..Default::default()
  };
  let err = fx
    .actions
    .update_user(&admin_actor(&fx), Uuid::new_v4(), patch.clone())
    .await
    .unwrap_err();
  assert!(matches!(err, ActionError::NotFound(_)), "got {:?}", err);

  let err = fx.actions.update_user(&admin_actor(&fx), fx.bob.id, patch).await.unwrap_err();
  assert!(matches!(err, ActionError::Validation(_)), "got {:?}", err);
}

#[tokio::test]
#[serial]
async fn test_password_update_enforces_minimum_length() {
  setup_tracing();
  let fx = Fixture::new().await;
  let before = fx.store.password_hash(fx.bob.id).unwrap();

  let patch = UserPatch {
    password: Some("abc".to_string()),
    ..Default::default()
  };
  let err = fx.actions.update_user(&admin_actor(&fx), fx.bob.id, patch).await.unwrap_err();
  assert!(matches!(err, ActionError::Validation(ref m) if m.contains("at least 6")), "got {:?}", err);
  assert_eq!(fx.store.password_hash(fx.bob.id).unwrap(), before);
}
