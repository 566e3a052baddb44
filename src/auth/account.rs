//! Route handlers for the signed in user's own account.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{
        Claims, CredentialHasher, Identity,
        user::{
            UserUpdate, delete_user, get_user_by_email, get_user_by_id, get_user_by_username,
            update_user,
        },
    },
    db::Database,
    envelope::{ApiJson, non_empty, respond, respond_empty},
};

/// The state needed to manage a user's account.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub db: Database,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            hasher: state.hasher.clone(),
        }
    }
}

fn user_not_found() -> Error {
    Error::NotFound("User not found".to_owned())
}

/// Get the public fields of the caller's account.
pub async fn get_profile(
    State(state): State<AccountState>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, Error> {
    let user = get_user_by_id(claims.id, &*state.db.lock()?)?.ok_or_else(user_not_found)?;

    Ok(respond(
        StatusCode::OK,
        "Profile retrieved successfully",
        user.public(),
    ))
}

/// The fields a user may change on their profile.
///
/// Missing and empty fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Change the caller's username, email or password.
///
/// # Errors
///
/// This function will return an error if no field is given, if the new email or username
/// belongs to another user, or if the account no longer exists.
pub async fn update_profile(
    State(state): State<AccountState>,
    Extension(claims): Extension<Claims>,
    ApiJson(form): ApiJson<ProfileForm>,
) -> Result<Response, Error> {
    let username = non_empty(form.username);
    let email = non_empty(form.email);
    let password = non_empty(form.password);

    if username.is_none() && email.is_none() && password.is_none() {
        return Err(Error::Validation("No fields to update".to_owned()));
    }

    {
        let connection = state.db.lock()?;

        if let Some(email) = &email {
            let owner = get_user_by_email(email, &connection)?;

            if owner.is_some_and(|owner| owner.id != claims.id) {
                return Err(Error::Conflict("Email already in use".to_owned()));
            }
        }

        if let Some(username) = &username {
            let owner = get_user_by_username(username, &connection)?;

            if owner.is_some_and(|owner| owner.id != claims.id) {
                return Err(Error::Conflict("Username already in use".to_owned()));
            }
        }
    }

    let password_hash = match password {
        Some(password) => Some(state.hasher.hash(&password)?),
        None => None,
    };

    let update = UserUpdate {
        username,
        email,
        password_hash,
    };
    let user = update_user(claims.id, update, &*state.db.lock()?)?.ok_or_else(user_not_found)?;

    Ok(respond(
        StatusCode::OK,
        "Profile updated successfully",
        user.public(),
    ))
}

/// Delete the caller's account along with all of their categories and transactions.
pub async fn delete_account(
    State(state): State<AccountState>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, Error> {
    if !delete_user(claims.id, &*state.db.lock()?)? {
        return Err(user_not_found());
    }

    tracing::info!("Deleted account for user {}", claims.id);

    Ok(respond_empty("Account deleted successfully"))
}

/// The `data` of a successful token validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedToken {
    pub user: Identity,
}

/// Echo the identity stored in the caller's token.
///
/// The auth middleware has already checked the token by the time this runs.
pub async fn validate_token(Extension(claims): Extension<Claims>) -> Response {
    respond(
        StatusCode::OK,
        "Token is valid",
        ValidatedToken {
            user: claims.identity(),
        },
    )
}

#[cfg(test)]
mod account_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        auth::{CredentialHasher, PublicUser, user::get_user_by_id},
        endpoints,
        envelope::Envelope,
        test_utils::{get_test_server, log_in, register, register_and_log_in},
    };

    use super::ValidatedToken;

    #[tokio::test]
    async fn validate_token_echoes_identity() {
        let (server, _) = get_test_server();
        let user = register(&server, "alice", "alice@example.com", "hunter2hunter2").await;
        let token = log_in(&server, "alice@example.com", "hunter2hunter2").await;

        let response = server
            .get(endpoints::VALIDATE_TOKEN)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Envelope<ValidatedToken>>();
        assert_eq!(body.message, "Token is valid");
        let identity = body.data.unwrap().user;
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[tokio::test]
    async fn validate_token_requires_token() {
        let (server, _) = get_test_server();

        server
            .get(endpoints::VALIDATE_TOKEN)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_profile_returns_public_fields() {
        let (server, _) = get_test_server();
        let user = register(&server, "alice", "alice@example.com", "hunter2hunter2").await;
        let token = log_in(&server, "alice@example.com", "hunter2hunter2").await;

        let response = server.get(endpoints::PROFILE).authorization_bearer(token).await;

        response.assert_status_ok();
        let body = response.json::<Envelope<PublicUser>>();
        assert_eq!(body.message, "Profile retrieved successfully");
        assert_eq!(body.data, Some(user));
    }

    #[tokio::test]
    async fn update_profile_changes_given_fields_and_rehashes_password() {
        let (server, state) = get_test_server();
        let user = register(&server, "alice", "alice@example.com", "hunter2hunter2").await;
        let token = log_in(&server, "alice@example.com", "hunter2hunter2").await;

        let response = server
            .put(endpoints::PROFILE)
            .authorization_bearer(token)
            .json(&json!({"username": "alicia", "email": "", "password": "newpassword123"}))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Envelope<PublicUser>>().data.unwrap();
        assert_eq!(updated.username, "alicia");
        assert_eq!(updated.email, "alice@example.com");

        let stored = get_user_by_id(user.id, &state.db.lock().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(
            state.hasher.verify("newpassword123", &stored.password_hash),
            Ok(true)
        );
    }

    #[tokio::test]
    async fn update_profile_allows_keeping_own_email() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .put(endpoints::PROFILE)
            .authorization_bearer(token)
            .json(&json!({"email": "alice@example.com"}))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn update_profile_rejects_email_of_other_user() {
        let (server, _) = get_test_server();
        register_and_log_in(&server, "bob").await;
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .put(endpoints::PROFILE)
            .authorization_bearer(token)
            .json(&json!({"email": "bob@example.com"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::failure("Email already in use")
        );
    }

    #[tokio::test]
    async fn update_profile_rejects_username_of_other_user() {
        let (server, _) = get_test_server();
        register_and_log_in(&server, "bob").await;
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .put(endpoints::PROFILE)
            .authorization_bearer(token)
            .json(&json!({"username": "bob"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::failure("Username already in use")
        );
    }

    #[tokio::test]
    async fn update_profile_rejects_empty_update() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .put(endpoints::PROFILE)
            .authorization_bearer(token)
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::failure("No fields to update")
        );
    }

    #[tokio::test]
    async fn delete_account_then_profile_is_not_found() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .delete(endpoints::ACCOUNT)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::success_empty("Account deleted successfully")
        );

        // The token outlives the account.
        let profile = server.get(endpoints::PROFILE).authorization_bearer(&token).await;
        profile.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            profile.json::<Envelope<Value>>(),
            Envelope::failure("User not found")
        );

        server
            .delete(endpoints::ACCOUNT)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
