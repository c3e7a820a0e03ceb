use sea_orm::{ConnectionTrait, DbBackend, Statement};
use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn ids(nodes: &Value) -> Vec<i64> {
    nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect()
}

mod tree {
    use super::*;

    #[tokio::test]
    async fn unbounded_tree_nests_every_level() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", Some(a)).await;
        let c = app.create_category(&token, store, "C", Some(b)).await;
        let d = app.create_category(&token, store, "D", None).await;

        let res = app.get_with_token(&routes::categories(store), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(ids(&res.body), vec![a as i64, d as i64]);
        let b_node = &res.body[0]["subcategories"][0];
        assert_eq!(b_node["id"], b);
        assert_eq!(b_node["subcategories"][0]["id"], c);
        assert_eq!(b_node["subcategories"][0]["depth"], 2);
    }

    #[tokio::test]
    async fn level_bounds_the_depth() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", Some(a)).await;
        app.create_category(&token, store, "C", Some(b)).await;

        let roots_only = app
            .get_with_token(&routes::category_tree(store, 0), &token)
            .await;
        assert_eq!(ids(&roots_only.body), vec![a as i64]);
        assert!(roots_only.body[0]["subcategories"].as_array().unwrap().is_empty());

        let one = app
            .get_with_token(&routes::category_tree(store, 1), &token)
            .await;
        let b_node = &one.body[0]["subcategories"][0];
        assert_eq!(b_node["id"], b);
        assert!(b_node["subcategories"].as_array().unwrap().is_empty());

        let unbounded = app
            .get_with_token(&routes::category_tree(store, -1), &token)
            .await;
        assert_eq!(
            unbounded.body[0]["subcategories"][0]["subcategories"]
                .as_array()
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn negative_level_other_than_minus_one_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;

        let res = app
            .get_with_token(&routes::category_tree(store, -2), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn tree_only_contains_the_requested_store() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let first = app.create_store(&token, "First").await;
        let second = app.create_store(&token, "Second").await;
        app.create_category(&token, first, "A", None).await;
        let other = app.create_category(&token, second, "B", None).await;

        let res = app.get_with_token(&routes::categories(second), &token).await;

        assert_eq!(ids(&res.body), vec![other as i64]);
    }

    #[tokio::test]
    async fn children_of_a_deleted_parent_are_dropped() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", Some(a)).await;
        app.create_category(&token, store, "C", Some(b)).await;

        // Soft-delete the middle node behind the API's back to orphan C.
        app.db
            .execute_raw(Statement::from_string(
                DbBackend::Postgres,
                format!("UPDATE category SET deleted_at = now() WHERE id = {b}"),
            ))
            .await
            .unwrap();

        let res = app.get_with_token(&routes::categories(store), &token).await;

        assert_eq!(ids(&res.body), vec![a as i64]);
        assert!(res.body[0]["subcategories"].as_array().unwrap().is_empty());
    }
}

mod write {
    use super::*;

    #[tokio::test]
    async fn parent_from_another_store_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let first = app.create_store(&token, "First").await;
        let second = app.create_store(&token, "Second").await;
        let foreign = app.create_category(&token, first, "A", None).await;

        let res = app
            .post_with_token(
                &routes::categories(second),
                &json!({"name": "B", "parent_category_id": foreign}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn category_under_wrong_store_path_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let first = app.create_store(&token, "First").await;
        let second = app.create_store(&token, "Second").await;
        let cat = app.create_category(&token, first, "A", None).await;

        let res = app
            .get_with_token(&routes::category(second, cat), &token)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn moving_a_category_under_its_descendant_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", Some(a)).await;
        let c = app.create_category(&token, store, "C", Some(b)).await;

        let onto_grandchild = app
            .patch_with_token(
                &routes::category(store, a),
                &json!({"parent_category_id": c}),
                &token,
            )
            .await;
        assert_eq!(onto_grandchild.status, 400);

        let onto_self = app
            .patch_with_token(
                &routes::category(store, a),
                &json!({"parent_category_id": a}),
                &token,
            )
            .await;
        assert_eq!(onto_self.status, 400);
    }

    #[tokio::test]
    async fn null_parent_makes_a_root_and_absent_parent_keeps_it() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", Some(a)).await;

        let renamed = app
            .patch_with_token(&routes::category(store, b), &json!({"name": "B2"}), &token)
            .await;
        assert_eq!(renamed.status, 200);
        assert_eq!(renamed.body["parent_category_id"], a);
        assert_eq!(renamed.body["name"], "B2");

        let detached = app
            .patch_with_token(
                &routes::category(store, b),
                &json!({"parent_category_id": null}),
                &token,
            )
            .await;
        assert_eq!(detached.status, 200);
        assert!(detached.body["parent_category_id"].is_null());
    }

    #[tokio::test]
    async fn category_with_children_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", Some(a)).await;

        let blocked = app.delete_with_token(&routes::category(store, a), &token).await;
        assert_eq!(blocked.status, 409);

        let leaf = app.delete_with_token(&routes::category(store, b), &token).await;
        assert_eq!(leaf.status, 204);

        let now_empty = app.delete_with_token(&routes::category(store, a), &token).await;
        assert_eq!(now_empty.status, 204);
    }
}

mod depth {
    use catalog_server::catalog::tree::MAX_CATEGORY_DEPTH;

    use super::*;

    /// A single chain whose last category sits at the deepest allowed level.
    async fn deepest_chain(app: &TestApp, token: &str, store: i32) -> Vec<i32> {
        let mut chain = vec![app.create_category(token, store, "L0", None).await];
        for level in 1..=MAX_CATEGORY_DEPTH {
            let parent = chain.last().copied();
            let id = app
                .create_category(token, store, &format!("L{level}"), parent)
                .await;
            chain.push(id);
        }
        chain
    }

    #[tokio::test]
    async fn creating_below_the_deepest_level_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let chain = deepest_chain(&app, &token, store).await;

        let res = app
            .post_with_token(
                &routes::categories(store),
                &json!({"name": "Too deep", "parent_category_id": chain.last()}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let tree = app.get_with_token(&routes::categories(store), &token).await;
        assert_eq!(tree.status, 200);
    }

    #[tokio::test]
    async fn moving_a_subtree_counts_its_height() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let chain = deepest_chain(&app, &token, store).await;
        let top = app.create_category(&token, store, "Top", None).await;
        app.create_category(&token, store, "Leaf", Some(top)).await;

        // Leaf would land one level past the limit.
        let too_deep = app
            .patch_with_token(
                &routes::category(store, top),
                &json!({"parent_category_id": chain[chain.len() - 2]}),
                &token,
            )
            .await;
        assert_eq!(too_deep.status, 400, "{}", too_deep.text);

        let fits = app
            .patch_with_token(
                &routes::category(store, top),
                &json!({"parent_category_id": chain[chain.len() - 3]}),
                &token,
            )
            .await;
        assert_eq!(fits.status, 200, "{}", fits.text);
    }

    #[tokio::test]
    async fn crossing_moves_cannot_both_succeed() {
        let app = TestApp::spawn().await;
        let token = app.create_admin("alice").await;
        let store = app.create_store(&token, "Shop").await;
        let a = app.create_category(&token, store, "A", None).await;
        let b = app.create_category(&token, store, "B", None).await;

        let a_under_b = json!({"parent_category_id": b});
        let b_under_a = json!({"parent_category_id": a});
        let route_a = routes::category(store, a);
        let route_b = routes::category(store, b);
        let (first, second) = tokio::join!(
            app.patch_with_token(&route_a, &a_under_b, &token),
            app.patch_with_token(&route_b, &b_under_a, &token),
        );

        let mut statuses = vec![first.status, second.status];
        statuses.sort();
        assert_eq!(statuses, vec![200, 400]);

        let tree = app.get_with_token(&routes::categories(store), &token).await;
        assert_eq!(ids(&tree.body).len(), 1);
        assert_eq!(tree.body[0]["subcategories"].as_array().unwrap().len(), 1);
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn other_admin_cannot_write_categories() {
        let app = TestApp::spawn().await;
        let alice = app.create_admin("alice").await;
        let bob = app.create_admin("bob").await;
        let store = app.create_store(&alice, "Shop").await;
        let cat = app.create_category(&alice, store, "A", None).await;

        let created = app
            .post_with_token(&routes::categories(store), &json!({"name": "B"}), &bob)
            .await;
        assert_eq!(created.status, 403);
        assert_eq!(created.body["code"], "PERMISSION_DENIED");

        let updated = app
            .patch_with_token(&routes::category(store, cat), &json!({"name": "Mine"}), &bob)
            .await;
        assert_eq!(updated.status, 403);

        let deleted = app.delete_with_token(&routes::category(store, cat), &bob).await;
        assert_eq!(deleted.status, 403);

        let still_there = app.get_with_token(&routes::category(store, cat), &alice).await;
        assert_eq!(still_there.body["name"], "A");
    }

    #[tokio::test]
    async fn foreign_category_through_own_store_is_forbidden() {
        let app = TestApp::spawn().await;
        let alice = app.create_admin("alice").await;
        let bob = app.create_admin("bob").await;
        let alice_store = app.create_store(&alice, "Alice's").await;
        let bob_store = app.create_store(&bob, "Bob's").await;
        let cat = app.create_category(&alice, alice_store, "A", None).await;

        let read = app
            .get_with_token(&routes::category(bob_store, cat), &bob)
            .await;
        assert_eq!(read.status, 403);

        let write = app
            .patch_with_token(
                &routes::category(bob_store, cat),
                &json!({"name": "Mine"}),
                &bob,
            )
            .await;
        assert_eq!(write.status, 403);
    }
}
