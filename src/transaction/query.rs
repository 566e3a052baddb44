//! Endpoints for reading the caller's transactions.

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    db::Database,
    envelope::{ApiPath, ApiQuery, non_empty, respond},
    ownership::{Access, load_owned},
    pagination::PaginationConfig,
    transaction::{
        TransactionId, form::parse_date, get_transaction, get_transactions_in_range,
        get_transactions_page,
    },
};

/// The state needed for reading transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub db: Database,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            pagination_config: state.pagination_config,
        }
    }
}

/// The query parameters for listing transactions.
///
/// When both dates are given every transaction in the range is returned and
/// `limit` and `offset` are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// List the caller's transactions newest first, either a page or a date range.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Response, Error> {
    let transactions = match (non_empty(query.start_date), non_empty(query.end_date)) {
        (Some(start_date), Some(end_date)) => {
            let start = parse_date("start_date", &start_date)?;
            let end = parse_date("end_date", &end_date)?;

            get_transactions_in_range(claims.id, start, end, &*state.db.lock()?)?
        }
        _ => {
            let page = state
                .pagination_config
                .page(query.limit.as_deref(), query.offset.as_deref())?;

            get_transactions_page(claims.id, page, &*state.db.lock()?)?
        }
    };

    Ok(respond(
        StatusCode::OK,
        "Transactions retrieved successfully",
        transactions,
    ))
}

/// Get a single transaction owned by the caller along with its category.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Response, Error> {
    let transaction = get_transaction(transaction_id, &*state.db.lock()?)?;
    let transaction = load_owned(transaction, claims.id, Access::Read)?;

    Ok(respond(
        StatusCode::OK,
        "Transaction retrieved successfully",
        transaction,
    ))
}
