//! Transaction update endpoint.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error,
    auth::Claims,
    category::get_category,
    db::DatabaseState,
    envelope::{ApiJson, ApiPath, respond},
    ownership::{Access, load_owned},
    transaction::{
        TransactionChanges, TransactionId,
        form::{TransactionForm, parse_date, validate_amount},
        get_transaction, update_transaction,
    },
};

/// A route handler for changing a transaction owned by the caller.
///
/// The category, amount and date keep their current value when missing, zero or empty.
/// The description keeps its current value only when the key is missing, so an empty
/// string or `null` clears it.
///
/// # Errors
/// Returns a validation error if no field is given, the amount is negative or the date is
/// malformed. Returns 404 or 403 if the transaction, or a newly chosen category, does not
/// exist or belongs to someone else.
pub async fn update_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<Response, Error> {
    let category_id = form.category_id();
    let amount = form.amount();
    let raw_date = form.date();

    if category_id.is_none() && amount.is_none() && raw_date.is_none() && !form.has_description()
    {
        return Err(Error::Validation("No fields to update".to_owned()));
    }

    let amount = amount.map(validate_amount).transpose()?;
    let date = raw_date.map(|raw| parse_date("date", raw)).transpose()?;

    let connection = state.db.lock()?;
    let existing = load_owned(
        get_transaction(transaction_id, &connection)?,
        claims.id,
        Access::Update,
    )?
    .transaction;

    if let Some(category_id) = category_id.filter(|id| Some(*id) != existing.category_id) {
        load_owned(get_category(category_id, &connection)?, claims.id, Access::Use)?;
    }

    let changes = TransactionChanges {
        category_id: category_id.or(existing.category_id),
        amount: amount.unwrap_or(existing.amount),
        description: match form.description {
            Some(description) => description,
            None => existing.description,
        },
        date: date.unwrap_or(existing.date),
    };

    let transaction = update_transaction(transaction_id, claims.id, changes, &connection)?
        .ok_or_else(|| Error::NotFound("Transaction not found".to_owned()))?;

    Ok(respond(
        StatusCode::OK,
        "Transaction updated successfully",
        transaction,
    ))
}
