mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_workspace_creation_and_owner_membership() {
    let app = TestApp::new().await;
    let (token, account_id) = app.signup("Grace Hopper", "grace@example.com", "password-one").await;

    // Name validation
    let response = app
        .send(Method::POST, "/api/v1/workspaces", Some(&token), None, Some(json!({ "name": "   " })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let ws_id = app.create_workspace(&token, "Compilers Inc").await;

    // Creator becomes admin with a profile named after the account,
    // all written in one transaction
    let response = app.send(Method::GET, "/api/v1/me", Some(&token), None, None).await;
    let body = body_json(response).await;
    let workspaces = body["data"]["workspaces"].as_array().unwrap();
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0]["workspace"]["id"], ws_id);
    assert_eq!(workspaces[0]["role"], "admin");
    assert_eq!(workspaces[0]["profile"]["name"], "Grace Hopper");
    assert_eq!(workspaces[0]["workspace"]["account_id"], account_id);

    // Reading the workspace requires the workspace context header
    let response = app
        .send(Method::GET, &format!("/api/v1/workspaces/{}", ws_id), Some(&token), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(Method::GET, &format!("/api/v1/workspaces/{}", ws_id), Some(&token), Some(&ws_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Compilers Inc");
}

#[tokio::test]
async fn test_workspace_access_is_scoped_to_members() {
    let app = TestApp::new().await;
    let (token_a, _) = app.signup("Member A", "a@example.com", "password-one").await;
    let (token_b, _) = app.signup("Outsider B", "b@example.com", "password-two").await;

    let ws_id = app.create_workspace(&token_a, "Private Space").await;

    // A non-member holds no role claim for the workspace
    let response = app
        .send(Method::GET, &format!("/api/v1/workspaces/{}", ws_id), Some(&token_b), Some(&ws_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A member's claims for workspace A do not grant access to workspace B
    let other_ws = app.create_workspace(&token_b, "B Space").await;
    let response = app
        .send(
            Method::GET,
            &format!("/api/v1/workspaces/{}", ws_id),
            Some(&token_b),
            Some(&other_ws),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_workspace_update_requires_admin_role() {
    let app = TestApp::new().await;
    let (admin_token, _) = app.signup("Admin", "admin@example.com", "password-one").await;
    let (user_token, user_id) = app.signup("Plain User", "user@example.com", "password-two").await;

    let ws_id = app.create_workspace(&admin_token, "Shared Space").await;

    let response = app
        .send(
            Method::POST,
            &format!("/api/v1/workspaces/{}/members", ws_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "account_id": user_id, "role": "user" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // User-role member cannot patch the workspace
    let response = app
        .send(
            Method::PATCH,
            &format!("/api/v1/workspaces/{}", ws_id),
            Some(&user_token),
            Some(&ws_id),
            Some(json!({ "name": "Hijacked" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin can
    let response = app
        .send(
            Method::PATCH,
            &format!("/api/v1/workspaces/{}", ws_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "name": "Renamed Space", "description": "now with a description" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Renamed Space");
    assert_eq!(body["data"]["description"], "now with a description");
}

#[tokio::test]
async fn test_workspace_deletion_cascades() {
    let app = TestApp::new().await;
    let (admin_token, _) = app.signup("Admin", "admin@example.com", "password-one").await;
    let (_t, member_one) = app.signup("Member One", "one@example.com", "password-two").await;
    let (_t, member_two) = app.signup("Member Two", "two@example.com", "password-three").await;

    let ws_id = app.create_workspace(&admin_token, "Doomed Space").await;

    for account_id in [&member_one, &member_two] {
        let response = app
            .send(
                Method::POST,
                &format!("/api/v1/workspaces/{}/members", ws_id),
                Some(&admin_token),
                Some(&ws_id),
                Some(json!({ "account_id": account_id, "role": "user" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let memberships: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE workspace_id = ?")
            .bind(&ws_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(memberships, 3);

    let response = app
        .send(Method::DELETE, &format!("/api/v1/workspaces/{}", ws_id), Some(&admin_token), Some(&ws_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Profiles, memberships and the workspace row are all gone
    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE workspace_id = ?")
        .bind(&ws_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let memberships: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE workspace_id = ?")
            .bind(&ws_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    let workspaces: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workspaces WHERE id = ?")
        .bind(&ws_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();

    assert_eq!(profiles, 0);
    assert_eq!(memberships, 0);
    assert_eq!(workspaces, 0);
}

#[tokio::test]
async fn test_profile_update_is_self_scoped() {
    let app = TestApp::new().await;
    let (token, account_id) = app.signup("Renamer", "renamer@example.com", "password-one").await;
    let ws_id = app.create_workspace(&token, "Profile Space").await;

    let response = app
        .send(
            Method::PATCH,
            &format!("/api/v1/workspaces/{}/profile", ws_id),
            Some(&token),
            Some(&ws_id),
            Some(json!({ "name": "The Renamer" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "The Renamer");
    assert_eq!(body["data"]["account_id"], account_id);

    let name: String =
        sqlx::query_scalar("SELECT name FROM profiles WHERE workspace_id = ? AND account_id = ?")
            .bind(&ws_id)
            .bind(&account_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(name, "The Renamer");
}
