use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn values(body: &Value) -> Vec<String> {
    body["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn variant_is_created_with_options() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;

    let res = app
        .create_variant(&token, store, category, &["S", "M", "L"])
        .await;

    assert_eq!(values(&res.body), vec!["S", "M", "L"]);
    assert_eq!(res.body["category_id"], category);
}

#[tokio::test]
async fn duplicate_values_in_one_request_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;

    let res = app
        .post_with_token(
            &routes::variants(store, category),
            &json!({"name": "Size", "weight": 1, "options": [{"value": "M"}, {"value": "M"}]}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn value_clashing_with_a_stored_option_is_a_conflict() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let created = app.create_variant(&token, store, category, &["S"]).await;

    let res = app
        .patch_with_token(
            &routes::variant(store, category, created.id()),
            &json!({"options": [{"value": "S"}]}),
            &token,
        )
        .await;

    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn updating_a_subset_of_options_keeps_the_rest() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let created = app
        .create_variant(&token, store, category, &["S", "M", "L"])
        .await;
    let variant = created.id();
    let m_id = created.body["options"][1]["id"].as_i64().unwrap();

    let res = app
        .patch_with_token(
            &routes::variant(store, category, variant),
            &json!({"options": [{"id": m_id, "value": "Medium", "description": "Regular fit"}]}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let fetched = app
        .get_with_token(&routes::variant(store, category, variant), &token)
        .await;
    assert_eq!(values(&fetched.body), vec!["S", "Medium", "L"]);
    assert_eq!(fetched.body["options"][1]["description"], "Regular fit");
}

#[tokio::test]
async fn absent_and_zero_fields_are_left_unchanged() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let created = app.create_variant(&token, store, category, &["S"]).await;

    let res = app
        .patch_with_token(
            &routes::variant(store, category, created.id()),
            &json!({"name": "", "weight": 0, "description": "Fits"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["name"], "Size");
    assert_eq!(res.body["weight"], 1);
    assert_eq!(res.body["description"], "Fits");
}

#[tokio::test]
async fn option_of_another_variant_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let other = app.create_variant(&token, store, category, &["Red"]).await;
    let other_option = other.body["options"][0]["id"].as_i64().unwrap();
    let mine = app.create_variant(&token, store, category, &["S"]).await;

    let res = app
        .patch_with_token(
            &routes::variant(store, category, mine.id()),
            &json!({"options": [{"id": other_option, "value": "Blue"}]}),
            &token,
        )
        .await;

    assert_eq!(res.status, 404);
    let untouched = app
        .get_with_token(&routes::variant(store, category, other.id()), &token)
        .await;
    assert_eq!(values(&untouched.body), vec!["Red"]);
}

#[tokio::test]
async fn variant_can_move_to_a_category_of_the_same_store_only() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let other_store = app.create_store(&token, "Other").await;
    let shirts = app.create_category(&token, store, "Shirts", None).await;
    let pants = app.create_category(&token, store, "Pants", None).await;
    let foreign = app.create_category(&token, other_store, "Hats", None).await;
    let created = app.create_variant(&token, store, shirts, &["S"]).await;
    let variant = created.id();

    let rejected = app
        .patch_with_token(
            &routes::variant(store, shirts, variant),
            &json!({"category_id": foreign}),
            &token,
        )
        .await;
    assert_eq!(rejected.status, 400);

    let moved = app
        .patch_with_token(
            &routes::variant(store, shirts, variant),
            &json!({"category_id": pants}),
            &token,
        )
        .await;
    assert_eq!(moved.status, 200);

    let under_new = app
        .get_with_token(&routes::variant(store, pants, variant), &token)
        .await;
    assert_eq!(under_new.status, 200);
}

#[tokio::test]
async fn delete_cascades_to_options() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let created = app.create_variant(&token, store, category, &["S"]).await;

    let res = app
        .delete_with_token(&routes::variant(store, category, created.id()), &token)
        .await;
    assert_eq!(res.status, 204);

    let list = app
        .get_with_token(&routes::variants(store, category), &token)
        .await;
    assert_eq!(list.body["pagination"]["total"], 0);

    let gone = app
        .get_with_token(&routes::variant(store, category, created.id()), &token)
        .await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn other_admin_cannot_list_variants() {
    let app = TestApp::spawn().await;
    let alice = app.create_admin("alice").await;
    let bob = app.create_admin("bob").await;
    let store = app.create_store(&alice, "Shop").await;
    let category = app.create_category(&alice, store, "Shirts", None).await;

    let res = app
        .get_with_token(&routes::variants(store, category), &bob)
        .await;

    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn single_option_is_deleted_and_its_value_freed() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let created = app.create_variant(&token, store, category, &["S", "M"]).await;
    let variant = created.id();
    let small = created.body["options"][0]["id"].as_i64().unwrap();

    let res = app
        .delete_with_token(
            &routes::variant_option(store, category, variant, small),
            &token,
        )
        .await;
    assert_eq!(res.status, 204);

    let fetched = app
        .get_with_token(&routes::variant(store, category, variant), &token)
        .await;
    assert_eq!(values(&fetched.body), vec!["M"]);

    let readded = app
        .patch_with_token(
            &routes::variant(store, category, variant),
            &json!({"options": [{"value": "S"}]}),
            &token,
        )
        .await;
    assert_eq!(readded.status, 200, "{}", readded.text);

    let again = app
        .delete_with_token(
            &routes::variant_option(store, category, variant, small),
            &token,
        )
        .await;
    assert_eq!(again.status, 404);
}

#[tokio::test]
async fn option_is_only_deleted_through_its_own_variant() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    let category = app.create_category(&token, store, "Shirts", None).await;
    let sizes = app.create_variant(&token, store, category, &["S"]).await;
    let colors = app.create_variant(&token, store, category, &["Red"]).await;
    let red = colors.body["options"][0]["id"].as_i64().unwrap();

    let res = app
        .delete_with_token(
            &routes::variant_option(store, category, sizes.id(), red),
            &token,
        )
        .await;
    assert_eq!(res.status, 404);

    let untouched = app
        .get_with_token(&routes::variant(store, category, colors.id()), &token)
        .await;
    assert_eq!(values(&untouched.body), vec!["Red"]);
}

#[tokio::test]
async fn other_admin_cannot_write_variants() {
    let app = TestApp::spawn().await;
    let alice = app.create_admin("alice").await;
    let bob = app.create_admin("bob").await;
    let store = app.create_store(&alice, "Shop").await;
    let category = app.create_category(&alice, store, "Shirts", None).await;
    let created = app.create_variant(&alice, store, category, &["S"]).await;
    let option = created.body["options"][0]["id"].as_i64().unwrap();

    let create = app
        .post_with_token(
            &routes::variants(store, category),
            &json!({"name": "Color", "weight": 1, "options": [{"value": "Red"}]}),
            &bob,
        )
        .await;
    assert_eq!(create.status, 403);

    let update = app
        .patch_with_token(
            &routes::variant(store, category, created.id()),
            &json!({"name": "Mine"}),
            &bob,
        )
        .await;
    assert_eq!(update.status, 403);

    let delete_option = app
        .delete_with_token(
            &routes::variant_option(store, category, created.id(), option),
            &bob,
        )
        .await;
    assert_eq!(delete_option.status, 403);

    let delete = app
        .delete_with_token(&routes::variant(store, category, created.id()), &bob)
        .await;
    assert_eq!(delete.status, 403);

    let intact = app
        .get_with_token(&routes::variant(store, category, created.id()), &alice)
        .await;
    assert_eq!(intact.body["name"], "Size");
    assert_eq!(values(&intact.body), vec!["S"]);
}

#[tokio::test]
async fn foreign_variant_through_own_store_is_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.create_admin("alice").await;
    let bob = app.create_admin("bob").await;
    let alice_store = app.create_store(&alice, "Alice's").await;
    let alice_category = app.create_category(&alice, alice_store, "Shirts", None).await;
    let created = app
        .create_variant(&alice, alice_store, alice_category, &["S"])
        .await;
    let bob_store = app.create_store(&bob, "Bob's").await;
    let bob_category = app.create_category(&bob, bob_store, "Mine", None).await;

    let read = app
        .get_with_token(&routes::variant(bob_store, bob_category, created.id()), &bob)
        .await;
    assert_eq!(read.status, 403);

    let write = app
        .patch_with_token(
            &routes::variant(bob_store, bob_category, created.id()),
            &json!({"name": "Mine"}),
            &bob,
        )
        .await;
    assert_eq!(write.status, 403);

    let delete = app
        .delete_with_token(&routes::variant(bob_store, bob_category, created.id()), &bob)
        .await;
    assert_eq!(delete.status, 403);
}
