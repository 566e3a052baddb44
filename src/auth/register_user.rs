//! The route handler for registering a new user.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{
        CredentialHasher,
        user::{create_user, get_user_by_email, get_user_by_username},
    },
    db::Database,
    envelope::{ApiJson, non_empty, respond},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db: Database,
    pub hasher: Arc<dyn CredentialHasher>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            hasher: state.hasher.clone(),
        }
    }
}

/// The data needed to register a user.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handler for registration requests.
///
/// Responds with 201 Created and the new user's public fields.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - A field is missing or empty.
/// - The email is already in use.
/// - The username is already in use.
/// - An internal error occurred when hashing the password or saving the user.
pub async fn register_user(
    State(state): State<RegistrationState>,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<Response, Error> {
    let (Some(username), Some(email), Some(password)) = (
        non_empty(form.username),
        non_empty(form.email),
        non_empty(form.password),
    ) else {
        return Err(Error::Validation("Missing required fields".to_owned()));
    };

    {
        let connection = state.db.lock()?;

        if get_user_by_email(&email, &connection)?.is_some() {
            return Err(Error::Conflict("Email already in use".to_owned()));
        }

        if get_user_by_username(&username, &connection)?.is_some() {
            return Err(Error::Conflict("Username already in use".to_owned()));
        }
    }

    let password_hash = state.hasher.hash(&password)?;
    let user = create_user(&username, &email, password_hash, &*state.db.lock()?)?;

    tracing::info!("Registered user {} ({})", user.id, user.username);

    Ok(respond(
        StatusCode::CREATED,
        "User registered successfully",
        user.public(),
    ))
}
