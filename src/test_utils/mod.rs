#![allow(missing_docs)]

//! Helpers for driving the full router in handler tests.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;
use time::Date;

use crate::{
    AppState,
    auth::{BcryptHasher, DEFAULT_TOKEN_VALIDITY, LogInResponse, PublicUser, TokenService},
    category::{Category, CategoryId, CategoryType},
    db::Database,
    endpoints,
    envelope::Envelope,
    pagination::PaginationConfig,
    routing::build_router,
    transaction::Transaction,
};

/// The password used by [register_and_log_in].
pub(crate) const TEST_PASSWORD: &str = "hunter2hunter2";

/// Create a test server backed by a fresh in-memory database.
///
/// The returned state shares the database with the server, so tests can inspect rows directly.
pub(crate) fn get_test_server() -> (TestServer, AppState) {
    let state = AppState::new(
        Database::open_in_memory().expect("Could not open in-memory database"),
        Arc::new(BcryptHasher::new(4)),
        TokenService::new("foobar", DEFAULT_TOKEN_VALIDITY),
        PaginationConfig::default(),
    );
    let server =
        TestServer::new(build_router(state.clone())).expect("Could not create test server");

    (server, state)
}

pub(crate) async fn register(
    server: &TestServer,
    username: &str,
    email: &str,
    password: &str,
) -> PublicUser {
    server
        .post(endpoints::REGISTER)
        .json(&json!({"username": username, "email": email, "password": password}))
        .await
        .json::<Envelope<PublicUser>>()
        .data
        .expect("Registration did not return a user")
}

pub(crate) async fn log_in(server: &TestServer, email: &str, password: &str) -> String {
    server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": email, "password": password}))
        .await
        .json::<Envelope<LogInResponse>>()
        .data
        .expect("Log in did not return a token")
        .token
}

/// Register `name` with the email "{name}@example.com" and return their token.
pub(crate) async fn register_and_log_in(server: &TestServer, name: &str) -> String {
    let email = format!("{name}@example.com");
    register(server, name, &email, TEST_PASSWORD).await;

    log_in(server, &email, TEST_PASSWORD).await
}

pub(crate) async fn create_test_category(
    server: &TestServer,
    token: &str,
    name: &str,
    category_type: CategoryType,
) -> Category {
    server
        .post(endpoints::CATEGORIES)
        .authorization_bearer(token)
        .json(&json!({"name": name, "type": category_type}))
        .await
        .json::<Envelope<Category>>()
        .data
        .expect("Could not create category")
}

/// Create a transaction with the description "Test transaction".
pub(crate) async fn create_test_transaction(
    server: &TestServer,
    token: &str,
    category_id: CategoryId,
    amount: f64,
    date: Date,
) -> Transaction {
    server
        .post(endpoints::TRANSACTIONS)
        .authorization_bearer(token)
        .json(&json!({
            "category_id": category_id,
            "amount": amount,
            "description": "Test transaction",
            "date": date.to_string(),
        }))
        .await
        .json::<Envelope<Transaction>>()
        .data
        .expect("Could not create transaction")
}
