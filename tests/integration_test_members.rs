mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::json;

async fn setup_workspace_with_member(app: &TestApp) -> (String, String, String, String) {
    let (admin_token, admin_id) = app.signup("Admin", "admin@example.com", "password-one").await;
    let (_member_token, member_id) = app.signup("Member", "member@example.com", "password-two").await;

    let ws_id = app.create_workspace(&admin_token, "Team Space").await;

    let response = app
        .send(
            Method::POST,
            &format!("/api/v1/workspaces/{}/members", ws_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "account_id": member_id, "role": "user" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    (admin_token, admin_id, member_id, ws_id)
}

#[tokio::test]
async fn test_member_join_creates_membership_and_profile() {
    let app = TestApp::new().await;
    let (admin_token, _admin_id, member_id, ws_id) = setup_workspace_with_member(&app).await;

    let response = app
        .send(
            Method::GET,
            &format!("/api/v1/workspaces/{}/members", ws_id),
            Some(&admin_token),
            Some(&ws_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let members = body["data"].as_array().unwrap();
    assert_eq!(members.len(), 2);

    let member = members.iter().find(|m| m["account_id"] == member_id.as_str()).unwrap();
    assert_eq!(member["role"], "user");
    // Profile defaults to the account's full name
    assert_eq!(member["profile_name"], "Member");

    let profiles: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE workspace_id = ? AND account_id = ?")
            .bind(&ws_id)
            .bind(&member_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(profiles, 1);
}

#[tokio::test]
async fn test_duplicate_membership_conflicts() {
    let app = TestApp::new().await;
    let (admin_token, _admin_id, member_id, ws_id) = setup_workspace_with_member(&app).await;

    let response = app
        .send(
            Method::POST,
            &format!("/api/v1/workspaces/{}/members", ws_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "account_id": member_id, "role": "admin" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_role_is_rejected() {
    let app = TestApp::new().await;
    let (admin_token, _admin_id, member_id, ws_id) = setup_workspace_with_member(&app).await;

    let response = app
        .send(
            Method::PUT,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, member_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "role": "owner" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_membership_and_profile_creation_is_atomic() {
    let app = TestApp::new().await;
    let (admin_token, _admin_id, _member_id, ws_id) = setup_workspace_with_member(&app).await;
    let (_t, victim_id) = app.signup("Victim", "victim@example.com", "password-three").await;

    // Force the profile insert to fail after the membership insert by
    // seeding a conflicting profile row for the same (account, workspace)
    sqlx::query("INSERT INTO profiles (id, name, workspace_id, account_id) VALUES (?, ?, ?, ?)")
        .bind(uuid::Uuid::new_v4().to_string())
        .bind("stray profile")
        .bind(&ws_id)
        .bind(&victim_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .send(
            Method::POST,
            &format!("/api/v1/workspaces/{}/members", ws_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "account_id": victim_id, "role": "user" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The membership insert must have rolled back with the profile failure
    let memberships: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM memberships WHERE workspace_id = ? AND account_id = ?",
    )
        .bind(&ws_id)
        .bind(&victim_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(memberships, 0);
}

#[tokio::test]
async fn test_last_admin_cannot_be_demoted_or_removed() {
    let app = TestApp::new().await;
    let (admin_token, admin_id, _member_id, ws_id) = setup_workspace_with_member(&app).await;

    // Demoting the only admin fails with no mutation
    let response = app
        .send(
            Method::PUT,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, admin_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "role": "user" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "cannot remove the last admin");

    let role: String =
        sqlx::query_scalar("SELECT role FROM memberships WHERE workspace_id = ? AND account_id = ?")
            .bind(&ws_id)
            .bind(&admin_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(role, "admin");

    // Removing the only admin fails too
    let response = app
        .send(
            Method::DELETE,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, admin_id),
            Some(&admin_token),
            Some(&ws_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_demotion_succeeds_with_two_admins() {
    let app = TestApp::new().await;
    let (admin_token, admin_id, member_id, ws_id) = setup_workspace_with_member(&app).await;

    // Promote the member, then demote the original admin
    let response = app
        .send(
            Method::PUT,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, member_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(
            Method::PUT,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, admin_id),
            Some(&admin_token),
            Some(&ws_id),
            Some(json!({ "role": "user" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "user");

    let admins: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM memberships WHERE workspace_id = ? AND role = 'admin'",
    )
        .bind(&ws_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn test_member_removal_deletes_profile() {
    let app = TestApp::new().await;
    let (admin_token, _admin_id, member_id, ws_id) = setup_workspace_with_member(&app).await;

    let response = app
        .send(
            Method::DELETE,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, member_id),
            Some(&admin_token),
            Some(&ws_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let memberships: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM memberships WHERE workspace_id = ? AND account_id = ?",
    )
        .bind(&ws_id)
        .bind(&member_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let profiles: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM profiles WHERE workspace_id = ? AND account_id = ?",
    )
        .bind(&ws_id)
        .bind(&member_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();

    assert_eq!(memberships, 0);
    assert_eq!(profiles, 0);
}

#[tokio::test]
async fn test_member_mutations_are_admin_only() {
    let app = TestApp::new().await;
    let (_admin_token, admin_id, _member_id, ws_id) = setup_workspace_with_member(&app).await;
    let member_token = app.login("member@example.com", "password-two").await;

    // User-role members can list but not mutate
    let response = app
        .send(
            Method::GET,
            &format!("/api/v1/workspaces/{}/members", ws_id),
            Some(&member_token),
            Some(&ws_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(
            Method::DELETE,
            &format!("/api/v1/workspaces/{}/members/{}", ws_id, admin_id),
            Some(&member_token),
            Some(&ws_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
