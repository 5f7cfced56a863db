//! PostgreSQL identity store and token ledger.
//!
//! These need a live database and are ignored by default:
//! `DATABASE_URL=postgres://... cargo test --test postgres_test -- --ignored`

use chrono::{Duration, Utc};
use uuid::Uuid;

use estate_core::config::DatabaseConfig;
use estate_core::error::{AuthFailure, ErrorKind};
use estate_database::migration::run_migrations;
use estate_database::{DatabasePool, IdentityStore, TokenLedger, TokenRepository, UserRepository};
use estate_entity::token::{NewToken, TokenType};
use estate_entity::user::{CreateUser, UpdateUser, User, UserRole};

struct Stores {
    users: UserRepository,
    tokens: TokenRepository,
}

async fn stores() -> Stores {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let config = DatabaseConfig {
        url,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let pool = DatabasePool::connect(&config)
        .await
        .expect("Failed to connect to test database");
    run_migrations(pool.pool())
        .await
        .expect("Failed to run migrations");

    Stores {
        users: UserRepository::new(pool.pool().clone()),
        tokens: TokenRepository::new(pool.pool().clone()),
    }
}

/// A fresh address per call, so tests share the database without cleanup.
fn unique_email() -> String {
    format!("{}@estate.test", Uuid::new_v4())
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        mobile_number: "0123456789".to_string(),
        role: UserRole::Customer,
    }
}

fn token(user: &User, token_type: TokenType) -> NewToken {
    NewToken {
        token: Uuid::new_v4().to_string(),
        token_type,
        user_id: user.id,
        expires_at: Utc::now() + Duration::minutes(10),
    }
}

fn pair(user: &User) -> [NewToken; 2] {
    [token(user, TokenType::Access), token(user, TokenType::Refresh)]
}

async fn live_tokens(stores: &Stores, user: &User) -> Vec<String> {
    let mut live: Vec<String> = stores
        .tokens
        .find_all_valid(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect();
    live.sort();
    live
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_unique_constraints_map_to_auth_failures() {
    let stores = stores().await;
    let email = unique_email();
    let user = stores.users.create(&new_user(&email)).await.unwrap();

    let err = stores.users.create(&new_user(&email)).await.unwrap_err();
    assert!(err.is_auth_failure(AuthFailure::DuplicateIdentity));

    let other = stores.users.create(&new_user(&unique_email())).await.unwrap();
    let err = stores
        .users
        .update(&UpdateUser {
            id: other.id,
            email: Some(email.clone()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_auth_failure(AuthFailure::DuplicateIdentity));

    let access = token(&user, TokenType::Access);
    stores.tokens.store(&access).await.unwrap();
    let err = stores.tokens.store(&access).await.unwrap_err();
    assert!(err.is_auth_failure(AuthFailure::DuplicateToken));
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_find_by_email_matches_stored_form() {
    let stores = stores().await;
    let email = unique_email();
    let user = stores.users.create(&new_user(&email)).await.unwrap();

    let found = stores.users.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.role, UserRole::Customer);
    assert!(stores.users.find_by_email(&unique_email()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_rotate_leaves_exactly_the_new_pair() {
    let stores = stores().await;
    let user = stores.users.create(&new_user(&unique_email())).await.unwrap();

    let first = pair(&user);
    assert_eq!(stores.tokens.rotate(user.id, &first).await.unwrap(), 0);
    let second = pair(&user);
    assert_eq!(stores.tokens.rotate(user.id, &second).await.unwrap(), 2);

    let mut expected: Vec<String> = second.iter().map(|t| t.token.clone()).collect();
    expected.sort();
    assert_eq!(live_tokens(&stores, &user).await, expected);
    assert!(stores.tokens.find_by_token(&first[0].token).await.unwrap().unwrap().revoked);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_failed_rotate_rolls_back() {
    let stores = stores().await;
    let user = stores.users.create(&new_user(&unique_email())).await.unwrap();
    let first = pair(&user);
    stores.tokens.rotate(user.id, &first).await.unwrap();

    let mut clash = pair(&user);
    clash[1].token = first[0].token.clone();
    let err = stores.tokens.rotate(user.id, &clash).await.unwrap_err();
    assert!(err.is_auth_failure(AuthFailure::DuplicateToken));

    let mut expected: Vec<String> = first.iter().map(|t| t.token.clone()).collect();
    expected.sort();
    assert_eq!(live_tokens(&stores, &user).await, expected);
    assert!(stores.tokens.find_by_token(&clash[0].token).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_concurrent_rotations_leave_one_pair() {
    let stores = stores().await;
    let user = stores.users.create(&new_user(&unique_email())).await.unwrap();

    let pairs: Vec<[NewToken; 2]> = (0..4).map(|_| pair(&user)).collect();
    let (a, b, c, d) = tokio::join!(
        stores.tokens.rotate(user.id, &pairs[0]),
        stores.tokens.rotate(user.id, &pairs[1]),
        stores.tokens.rotate(user.id, &pairs[2]),
        stores.tokens.rotate(user.id, &pairs[3]),
    );
    for result in [a, b, c, d] {
        result.unwrap();
    }

    let live = live_tokens(&stores, &user).await;
    assert_eq!(live.len(), 2);
    assert!(
        pairs.iter().any(|p| {
            let mut tokens: Vec<String> = p.iter().map(|t| t.token.clone()).collect();
            tokens.sort();
            tokens == live
        }),
        "live tokens must be one complete pair"
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_replace_password_revokes_in_the_same_step() {
    let stores = stores().await;
    let user = stores.users.create(&new_user(&unique_email())).await.unwrap();
    stores.tokens.rotate(user.id, &pair(&user)).await.unwrap();

    assert_eq!(
        stores.users.replace_password(user.id, "new-hash").await.unwrap(),
        2
    );
    assert!(live_tokens(&stores, &user).await.is_empty());
    let stored = stores.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "new-hash");

    let err = stores
        .users
        .replace_password(Uuid::new_v4(), "x")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_delete_cascades_into_the_ledger() {
    let stores = stores().await;
    let user = stores.users.create(&new_user(&unique_email())).await.unwrap();
    let tokens = pair(&user);
    stores.tokens.rotate(user.id, &tokens).await.unwrap();

    assert!(stores.users.delete(user.id).await.unwrap());
    assert!(stores.tokens.find_by_token(&tokens[0].token).await.unwrap().is_none());
    assert!(!stores.users.delete(user.id).await.unwrap());

    let err = stores.tokens.rotate(user.id, &pair(&user)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
