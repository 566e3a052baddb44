//! Category deletion endpoint.

use axum::{Extension, extract::State, response::Response};

use crate::{
    Error,
    auth::Claims,
    category::{CategoryId, delete_category, get_category},
    db::DatabaseState,
    envelope::{ApiPath, respond_empty},
    ownership::{Access, load_owned},
};

/// A route handler for deleting a category owned by the caller.
///
/// Transactions in the category are kept without a category.
pub async fn delete_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Response, Error> {
    let connection = state.db.lock()?;

    load_owned(
        get_category(category_id, &connection)?,
        claims.id,
        Access::Delete,
    )?;
    delete_category(category_id, claims.id, &connection)?;

    Ok(respond_empty("Category deleted successfully"))
}
