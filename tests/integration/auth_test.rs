//! Integration tests for the token lifecycle: register, authenticate,
//! refresh, logout.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_register_login_user_logout_scenario() {
    let app = helpers::TestApp::new();
    app.register("a@x.com", "correct-horse", "CUSTOMER").await;
    let tokens = app.login("a@x.com", "correct-horse").await;

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "a@x.com");
    assert_eq!(response.body["role"], "CUSTOMER");
    assert!(response.body.get("passwordHash").is_none());

    let response = app
        .request("POST", "/api/v1/auth/logout", None, Some(&tokens.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refreshToken": tokens.refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_returns_usable_pair() {
    let app = helpers::TestApp::new();
    let tokens = app.register("new@x.com", "correct-horse", "DEALER").await;
    assert_ne!(tokens.access, tokens.refresh);

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["firstName"], "Test");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = helpers::TestApp::new();
    app.register("dup@x.com", "correct-horse", "CUSTOMER").await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(helpers::register_body("DUP@x.com", "other-horse", "DEALER")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.identities.len().await, 1);
}

#[tokio::test]
async fn test_register_validation() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(helpers::register_body("not-an-email", "correct-horse", "CUSTOMER")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(helpers::register_body("short@x.com", "abc", "CUSTOMER")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(helpers::register_body("role@x.com", "correct-horse", "OWNER")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.identities.is_empty().await);
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = helpers::TestApp::new();
    app.register("b@x.com", "correct-horse", "CUSTOMER").await;

    let wrong_password = app.authenticate("b@x.com", "wrong-horse").await;
    let unknown_email = app.authenticate("nobody@x.com", "correct-horse").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = helpers::TestApp::new();
    app.register("Case@X.com", "correct-horse", "CUSTOMER").await;
    let tokens = app.login("case@x.COM", "correct-horse").await;

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.access))
        .await;
    assert_eq!(response.body["email"], "case@x.com");
}

#[tokio::test]
async fn test_garbage_and_missing_tokens_are_forbidden() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Access denied");

    let response = app.request("GET", "/api/v1/auth/user", None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request_with_header("GET", "/api/v1/auth/user", "Basic dXNlcjpwYXNz")
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = helpers::TestApp::new();
    let tokens = app.register("case@x.com", "correct-horse", "DEALER").await;

    for scheme in ["bearer", "BEARER"] {
        let response = app
            .request_with_header(
                "GET",
                "/api/v1/auth/user",
                &format!("{scheme} {}", tokens.access),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "scheme {scheme}");
        assert_eq!(response.body["email"], "case@x.com");
    }
}

#[tokio::test]
async fn test_public_routes_ignore_bad_tokens() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            Some(helpers::register_body("pub@x.com", "correct-horse", "CUSTOMER")),
            Some("garbage"),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.request("GET", "/api/health", None, Some("garbage")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
}

#[tokio::test]
async fn test_refresh_rotates_the_pair() {
    let app = helpers::TestApp::new();
    let first = app.register("r@x.com", "correct-horse", "CUSTOMER").await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refreshToken": first.refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let second_access = response.body["accessToken"].as_str().unwrap().to_string();

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&first.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&second_access))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The spent refresh token cannot be replayed.
    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refreshToken": first.refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_types_are_not_interchangeable() {
    let app = helpers::TestApp::new();
    let tokens = app.register("t@x.com", "correct-horse", "CUSTOMER").await;

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.refresh))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refreshToken": tokens.access })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Neither failed attempt disturbed the live pair.
    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&tokens.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_requires_a_token() {
    let app = helpers::TestApp::new();
    let response = app.request("POST", "/api/v1/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
