use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn admin_sees_only_own_stores() {
    let app = TestApp::spawn().await;
    let alice = app.create_admin("alice").await;
    let bob = app.create_admin("bob").await;
    app.create_store(&alice, "A1").await;
    app.create_store(&alice, "A2").await;
    app.create_store(&bob, "B1").await;

    let res = app.get_with_token(routes::STORES, &alice).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["pagination"]["total"], 2);
}

#[tokio::test]
async fn list_is_paginated() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    for i in 0..5 {
        app.create_store(&token, &format!("S{i}")).await;
    }

    let res = app
        .get_with_token(&format!("{}?page=2&per_page=2", routes::STORES), &token)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["data"][0]["name"], "S2");
    assert_eq!(res.body["pagination"]["page"], 2);
    assert_eq!(res.body["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn other_admin_cannot_read_or_modify_store() {
    let app = TestApp::spawn().await;
    let alice = app.create_admin("alice").await;
    let bob = app.create_admin("bob").await;
    let store = app.create_store(&alice, "Mine").await;

    let read = app.get_with_token(&routes::store(store), &bob).await;
    assert_eq!(read.status, 403);
    assert_eq!(read.body["code"], "PERMISSION_DENIED");

    let write = app
        .patch_with_token(&routes::store(store), &json!({"name": "Stolen"}), &bob)
        .await;
    assert_eq!(write.status, 403);

    let unchanged = app.get_with_token(&routes::store(store), &alice).await;
    assert_eq!(unchanged.body["name"], "Mine");
}

#[tokio::test]
async fn update_merges_present_fields_only() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let res = app
        .post_with_token(
            routes::STORES,
            &json!({"name": "Shop", "description": "Original"}),
            &token,
        )
        .await;
    let store = res.id();

    let res = app
        .patch_with_token(
            &routes::store(store),
            &json!({"name": "Renamed", "description": ""}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "Renamed");
    assert_eq!(res.body["description"], "Original");
}

#[tokio::test]
async fn store_with_categories_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;
    app.create_category(&token, store, "Shoes", None).await;

    let res = app.delete_with_token(&routes::store(store), &token).await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn deleted_store_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_admin("alice").await;
    let store = app.create_store(&token, "Shop").await;

    let del = app.delete_with_token(&routes::store(store), &token).await;
    assert_eq!(del.status, 204);

    let res = app.get_with_token(&routes::store(store), &token).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
