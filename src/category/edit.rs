//! Category update endpoint.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error,
    auth::Claims,
    category::{CategoryForm, CategoryId, CategoryType, get_category, update_category},
    db::DatabaseState,
    envelope::{ApiJson, ApiPath, non_empty, respond},
    ownership::{Access, load_owned},
};

/// A route handler for renaming a category or changing its type.
///
/// Fields that are missing or empty keep their current value.
///
/// # Errors
/// Returns a validation error if neither field is given or the type is invalid, then
/// 404 or 403 if the category does not exist or belongs to someone else.
pub async fn update_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<Response, Error> {
    let name = non_empty(form.name);
    let category_type = non_empty(form.category_type)
        .map(|raw| raw.parse::<CategoryType>())
        .transpose();

    if name.is_none() && matches!(category_type, Ok(None)) {
        return Err(Error::Validation("No fields to update".to_owned()));
    }
    let category_type = category_type?;

    let connection = state.db.lock()?;
    let existing = load_owned(
        get_category(category_id, &connection)?,
        claims.id,
        Access::Update,
    )?;

    let name = name.unwrap_or(existing.name);
    let category_type = category_type.unwrap_or(existing.category_type);

    let category = update_category(category_id, claims.id, &name, category_type, &connection)?
        .ok_or_else(|| Error::NotFound("Category not found".to_owned()))?;

    Ok(respond(
        StatusCode::OK,
        "Category updated successfully",
        category,
    ))
}
