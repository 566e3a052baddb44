//! This file defines the route for handling log-in requests.
//! The rest of the auth module handles the lower level password and token logic.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{CredentialHasher, Identity, TokenService, user::get_user_by_email},
    db::Database,
    envelope::{ApiJson, non_empty, respond},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    pub db: Database,
    pub hasher: Arc<dyn CredentialHasher>,
    pub token_service: TokenService,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            hasher: state.hasher.clone(),
            token_service: state.token_service.clone(),
        }
    }
}

/// The credentials entered during log-in.
#[derive(Debug, Default, Deserialize)]
pub struct LogInData {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The `data` of a successful log-in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInResponse {
    pub user: Identity,
    pub token: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, a signed token is returned along with the user's identity.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or creating the token.
///
/// The last two user facing cases produce the same error so that clients cannot tell which
/// email addresses are registered.
pub async fn post_log_in(
    State(state): State<LoginState>,
    ApiJson(user_data): ApiJson<LogInData>,
) -> Result<Response, Error> {
    let (Some(email), Some(password)) = (non_empty(user_data.email), non_empty(user_data.password))
    else {
        return Err(Error::Validation("Missing email or password".to_owned()));
    };

    let user = get_user_by_email(&email, &*state.db.lock()?)?.ok_or_else(|| {
        tracing::debug!("Log-in attempt for unregistered email");
        Error::InvalidCredentials
    })?;

    if !state.hasher.verify(&password, &user.password_hash)? {
        tracing::debug!("Log-in attempt with wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let identity = user.identity();
    let token = state.token_service.issue(&identity)?;

    Ok(respond(
        StatusCode::OK,
        "Login successful",
        LogInResponse {
            user: identity,
            token,
        },
    ))
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        envelope::Envelope,
        test_utils::{get_test_server, register},
    };

    use super::LogInResponse;

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let (server, state) = get_test_server();
        let user = register(&server, "alice", "alice@example.com", "hunter2hunter2").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": "alice@example.com", "password": "hunter2hunter2"}))
            .await;

        response.assert_status_ok();
        let body = response.json::<Envelope<LogInResponse>>();
        assert_eq!(body.message, "Login successful");
        let data = body.data.expect("log-in response should have data");
        assert_eq!(data.user.id, user.id);
        assert_eq!(data.user.username, "alice");
        assert_eq!(data.user.email, "alice@example.com");

        let claims = state.token_service.verify(&data.token).unwrap();
        assert_eq!(claims.identity(), data.user);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": "alice@example.com"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::failure("Missing email or password")
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let (server, _) = get_test_server();
        register(&server, "alice", "alice@example.com", "hunter2hunter2").await;

        let wrong_password = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": "alice@example.com", "password": "wrongpassword"}))
            .await;
        let unknown_email = server
            .post(endpoints::LOG_IN)
            .json(&json!({"email": "nobody@example.com", "password": "hunter2hunter2"}))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_email.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.text(), unknown_email.text());
        assert_eq!(
            wrong_password.json::<Envelope<Value>>(),
            Envelope::failure("Invalid credentials")
        );
    }
}
