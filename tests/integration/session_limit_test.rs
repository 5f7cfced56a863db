//! Integration tests for the one-live-pair-per-account rule.

mod helpers;

use axum::http::StatusCode;
use estate_database::TokenLedger;

#[tokio::test]
async fn test_second_login_supersedes_the_first() {
    let app = helpers::TestApp::new();
    let first = app.register("s@x.com", "correct-horse", "DEALER").await;
    let second = app.login("s@x.com", "correct-horse").await;

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&first.access))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/refresh",
            Some(serde_json::json!({ "refreshToken": first.refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&second.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_ledger_holds_exactly_one_valid_pair() {
    let app = helpers::TestApp::new();
    app.register("s@x.com", "correct-horse", "CUSTOMER").await;
    for _ in 0..3 {
        app.login("s@x.com", "correct-horse").await;
    }

    let user = app.user("s@x.com").await;
    let valid = app.ledger.find_all_valid(user.id).await.unwrap();
    assert_eq!(valid.len(), 2);
    assert_eq!(app.ledger.len().await, 8);
}

#[tokio::test]
async fn test_concurrent_logins_leave_one_valid_pair() {
    let app = helpers::TestApp::new();
    app.register("s@x.com", "correct-horse", "CUSTOMER").await;

    let (a, b) = tokio::join!(
        app.authenticate("s@x.com", "correct-horse"),
        app.authenticate("s@x.com", "correct-horse"),
    );
    assert_eq!(a.status, StatusCode::ACCEPTED);
    assert_eq!(b.status, StatusCode::ACCEPTED);

    let user = app.user("s@x.com").await;
    let valid = app.ledger.find_all_valid(user.id).await.unwrap();
    assert_eq!(valid.len(), 2);

    let live: Vec<bool> = [&a, &b]
        .iter()
        .map(|r| {
            let access = r.body["accessToken"].as_str().unwrap();
            valid.iter().any(|t| t.token == access)
        })
        .collect();
    assert_eq!(live.iter().filter(|l| **l).count(), 1);
}

#[tokio::test]
async fn test_sessions_of_different_accounts_are_independent() {
    let app = helpers::TestApp::new();
    let one = app.register("one@x.com", "correct-horse", "CUSTOMER").await;
    let two = app.register("two@x.com", "correct-horse", "CUSTOMER").await;

    app.request("POST", "/api/v1/auth/logout", None, Some(&one.access))
        .await;

    let response = app
        .request("GET", "/api/v1/auth/user", None, Some(&two.access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
