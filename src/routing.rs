//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::Request,
    http::{
        HeaderValue, Method, StatusCode, Uri,
        header::{AUTHORIZATION, CONTENT_TYPE, LOCATION},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    auth::{
        auth_guard, delete_account, get_profile, post_log_in, register_user, update_profile,
        validate_token,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    envelope::Envelope,
    health::{get_health, get_root},
    transaction::{
        category_totals_endpoint, create_transaction_endpoint, delete_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint, monthly_totals_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::VALIDATE_TOKEN, get(validate_token))
        .route(endpoints::PROFILE, get(get_profile).put(update_profile))
        .route(endpoints::ACCOUNT, delete(delete_account))
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::CATEGORY_TOTALS, get(category_totals_endpoint))
        .route(endpoints::MONTHLY_TOTALS, get(monthly_totals_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(redirect_double_slashes))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Envelope::<()>::failure("Route not found"),
    )
        .into_response()
}

/// Permanently redirect paths containing "//" to the same path with the slashes collapsed.
async fn redirect_double_slashes(request: Request, next: Next) -> Response {
    let uri = request.uri();

    if !uri.path().contains("//") {
        return next.run(request).await;
    }

    let target = collapse_slashes(uri);
    tracing::debug!("Redirecting {uri} to {target}");

    match HeaderValue::from_str(&target) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response(),
        Err(error) => {
            tracing::error!("Could not build redirect location from {target:?}: {error}");
            next.run(request).await
        }
    }
}

/// Collapse runs of slashes in the path of `uri`, keeping the query string.
fn collapse_slashes(uri: &Uri) -> String {
    let mut path = String::with_capacity(uri.path().len());

    for character in uri.path().chars() {
        if character == '/' && path.ends_with('/') {
            continue;
        }

        path.push(character);
    }

    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}
