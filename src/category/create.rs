//! Category creation endpoint.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    Error,
    auth::Claims,
    category::{CategoryType, create_category},
    db::DatabaseState,
    envelope::{ApiJson, non_empty, respond},
};

/// The fields of a new category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// A route handler for creating a new category owned by the caller.
///
/// # Errors
/// Returns a validation error if the name or type is missing, or the type is not
/// "income" or "expense".
pub async fn create_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<Response, Error> {
    let (Some(name), Some(raw_type)) = (non_empty(form.name), non_empty(form.category_type))
    else {
        return Err(Error::Validation("Missing required fields".to_owned()));
    };
    let category_type: CategoryType = raw_type.parse()?;

    let category = create_category(claims.id, &name, category_type, &*state.db.lock()?)?;

    Ok(respond(
        StatusCode::CREATED,
        "Category created successfully",
        category,
    ))
}
