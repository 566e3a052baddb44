use axum::{Extension, extract::State, response::Response};

use crate::{
    Error,
    auth::Claims,
    db::DatabaseState,
    envelope::{ApiPath, respond_empty},
    ownership::{Access, load_owned},
    transaction::{TransactionId, delete_transaction, get_transaction},
};

/// A route handler for deleting a transaction owned by the caller.
pub async fn delete_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Response, Error> {
    let connection = state.db.lock()?;

    load_owned(
        get_transaction(transaction_id, &connection)?,
        claims.id,
        Access::Delete,
    )?;
    delete_transaction(transaction_id, claims.id, &connection)?;

    Ok(respond_empty("Transaction deleted successfully"))
}
