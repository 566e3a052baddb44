//! Endpoints for reading the caller's categories.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    Error,
    auth::Claims,
    category::{CategoryId, CategoryType, get_categories, get_category},
    db::DatabaseState,
    envelope::{ApiPath, ApiQuery, respond},
    ownership::{Access, load_owned},
};

/// The query parameters for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// List the caller's categories sorted by name, optionally filtered by `?type=`.
pub async fn list_categories_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(filter): ApiQuery<CategoryFilter>,
) -> Result<Response, Error> {
    let category_type = match filter.category_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<CategoryType>()?),
    };

    let categories = get_categories(claims.id, category_type, &*state.db.lock()?)?;

    Ok(respond(
        StatusCode::OK,
        "Categories retrieved successfully",
        categories,
    ))
}

/// Get a single category owned by the caller.
pub async fn get_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Response, Error> {
    let category = get_category(category_id, &*state.db.lock()?)?;
    let category = load_owned(category, claims.id, Access::Read)?;

    Ok(respond(
        StatusCode::OK,
        "Category retrieved successfully",
        category,
    ))
}
