//! Authentication middleware that validates bearer tokens.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{AppState, Error, auth::TokenService};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Verifies the bearer tokens.
    pub token_service: TokenService,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_service: state.token_service.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// The token's claims are placed into the request and the request executed normally if the
/// token is valid, otherwise a 401 response is returned without calling the handler.
///
/// **Note**: Route handlers can use the function argument `Extension(claims): Extension<Claims>`
/// to receive the caller's identity.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match request.headers().typed_get::<Authorization<Bearer>>() {
        Some(Authorization(bearer)) => state.token_service.verify(bearer.token()),
        None => Err(Error::MissingToken),
    };

    match claims {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}
