//! Integration tests for account administration.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use estate_database::TokenLedger;

struct Fixture {
    app: helpers::TestApp,
    admin: helpers::Tokens,
}

async fn fixture() -> Fixture {
    let app = helpers::TestApp::new();
    let admin = app.register("admin@x.com", "correct-horse", "ADMIN").await;
    Fixture { app, admin }
}

impl Fixture {
    async fn post(&self, path: &str, body: Option<serde_json::Value>) -> helpers::TestResponse {
        self.app
            .request("POST", path, body, Some(&self.admin.access))
            .await
    }

    async fn get(&self, path: &str) -> helpers::TestResponse {
        self.app
            .request("GET", path, None, Some(&self.admin.access))
            .await
    }
}

fn ban_body(hours: i64) -> serde_json::Value {
    serde_json::json!({ "bannedTill": (Utc::now() + Duration::hours(hours)).to_rfc3339() })
}

#[tokio::test]
async fn test_ban_revokes_tokens_and_blocks_login_until_unban() {
    let fx = fixture().await;
    let dealer = fx.app.register("d@x.com", "correct-horse", "DEALER").await;
    let id = fx.app.user("d@x.com").await.id;

    let response = fx
        .post(&format!("/api/v1/admin/user-management/{id}/ban"), Some(ban_body(24)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["bannedTill"].is_string());
    assert!(fx.app.ledger.find_all_valid(id).await.unwrap().is_empty());

    let response = fx
        .app
        .request("GET", "/api/v1/auth/user", None, Some(&dealer.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = fx.app.authenticate("d@x.com", "correct-horse").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // A wrong password still reads as bad credentials on a banned account.
    let response = fx.app.authenticate("d@x.com", "wrong-horse").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = fx
        .post(&format!("/api/v1/admin/user-management/{id}/unban"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["bannedTill"].is_null());

    // Tokens revoked by the ban stay revoked.
    let response = fx
        .app
        .request("GET", "/api/v1/auth/user", None, Some(&dealer.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    fx.app.login("d@x.com", "correct-horse").await;
}

#[tokio::test]
async fn test_ban_validation() {
    let fx = fixture().await;
    fx.app.register("d@x.com", "correct-horse", "DEALER").await;
    let id = fx.app.user("d@x.com").await.id;
    let admin_id = fx.app.user("admin@x.com").await.id;

    let response = fx
        .post(&format!("/api/v1/admin/user-management/{id}/ban"), Some(ban_body(-1)))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fx
        .post(
            &format!("/api/v1/admin/user-management/{admin_id}/ban"),
            Some(ban_body(24)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fx
        .post("/api/v1/admin/user-management/not-a-uuid/ban", Some(ban_body(24)))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_filter_users() {
    let fx = fixture().await;
    fx.app.register("c@x.com", "correct-horse", "CUSTOMER").await;
    fx.app.register("d@x.com", "correct-horse", "DEALER").await;
    let id = fx.app.user("c@x.com").await.id;

    let response = fx.get(&format!("/api/v1/admin/user-management/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "c@x.com");

    let response = fx.get("/api/v1/admin/user-management?role=DEALER").await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "d@x.com");

    let response = fx
        .get("/api/v1/admin/user-management/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_account_and_its_tokens() {
    let fx = fixture().await;
    let customer = fx.app.register("c@x.com", "correct-horse", "CUSTOMER").await;
    let id = fx.app.user("c@x.com").await.id;
    let path = format!("/api/v1/admin/user-management/{id}");

    let response = fx.app.request("DELETE", &path, None, Some(&fx.admin.access)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = fx
        .app
        .request("GET", "/api/v1/auth/user", None, Some(&customer.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    assert_eq!(fx.get(&path).await.status, StatusCode::NOT_FOUND);
    let response = fx.app.request("DELETE", &path, None, Some(&fx.admin.access)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // The email is free again.
    fx.app.register("c@x.com", "correct-horse", "CUSTOMER").await;
}

#[tokio::test]
async fn test_admin_cannot_delete_itself() {
    let fx = fixture().await;
    let admin_id = fx.app.user("admin@x.com").await.id;

    let response = fx
        .app
        .request(
            "DELETE",
            &format!("/api/v1/admin/user-management/{admin_id}"),
            None,
            Some(&fx.admin.access),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_changes_role_and_email() {
    let fx = fixture().await;
    let customer = fx.app.register("c@x.com", "correct-horse", "CUSTOMER").await;
    let id = fx.app.user("c@x.com").await.id;

    let response = fx
        .post(
            &format!("/api/v1/admin/user-management/{id}"),
            Some(serde_json::json!({ "role": "DEALER", "email": "Dealer@X.com" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "DEALER");
    assert_eq!(response.body["email"], "dealer@x.com");

    let response = fx
        .app
        .request("GET", "/api/v1/auth/user", None, Some(&customer.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = fx.app.authenticate("c@x.com", "correct-horse").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let tokens = fx.app.login("dealer@x.com", "correct-horse").await;
    let response = fx
        .app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "DEALER");
}

#[tokio::test]
async fn test_admin_profile_edit_keeps_sessions() {
    let fx = fixture().await;
    let customer = fx.app.register("c@x.com", "correct-horse", "CUSTOMER").await;
    let id = fx.app.user("c@x.com").await.id;

    let response = fx
        .post(
            &format!("/api/v1/admin/user-management/{id}"),
            Some(serde_json::json!({ "firstName": "Renamed", "role": "CUSTOMER" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["firstName"], "Renamed");

    let response = fx
        .app
        .request("GET", "/api/v1/auth/user", None, Some(&customer.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_update_rejections() {
    let fx = fixture().await;
    let customer = fx.app.register("c@x.com", "correct-horse", "CUSTOMER").await;
    fx.app.register("taken@x.com", "correct-horse", "DEALER").await;
    let id = fx.app.user("c@x.com").await.id;
    let path = format!("/api/v1/admin/user-management/{id}");

    let response = fx
        .post(&path, Some(serde_json::json!({ "email": "TAKEN@x.com" })))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = fx
        .post(&path, Some(serde_json::json!({ "email": "not-an-email" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fx
        .post(
            "/api/v1/admin/user-management/00000000-0000-0000-0000-000000000000",
            Some(serde_json::json!({ "role": "DEALER" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = fx
        .app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({ "role": "ADMIN" })),
            Some(&customer.access),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(fx.app.user("c@x.com").await.role.to_string(), "CUSTOMER");
}
