//! Transaction creation endpoint.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error,
    auth::Claims,
    category::get_category,
    db::DatabaseState,
    envelope::{ApiJson, respond},
    ownership::{Access, load_owned},
    transaction::{
        Transaction, create_transaction,
        form::{TransactionForm, parse_date, validate_amount},
    },
};

/// A route handler for recording a new transaction against one of the caller's categories.
///
/// An empty or missing description is stored as `null`.
///
/// # Errors
/// Returns a validation error if the category, amount or date is missing, the amount is not
/// positive or the date is malformed. Returns 404 or 403 if the category does not exist or
/// belongs to someone else.
pub async fn create_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<Response, Error> {
    let (Some(category_id), Some(amount), Some(raw_date)) =
        (form.category_id(), form.amount(), form.date())
    else {
        return Err(Error::Validation("Missing required fields".to_owned()));
    };
    let amount = validate_amount(amount)?;
    let date = parse_date("date", raw_date)?;
    let description = form.description.flatten().filter(|d| !d.is_empty());

    let connection = state.db.lock()?;
    load_owned(get_category(category_id, &connection)?, claims.id, Access::Use)?;

    let transaction = create_transaction(
        Transaction::build(claims.id, category_id, amount, date).description(description),
        &connection,
    )?;

    Ok(respond(
        StatusCode::CREATED,
        "Transaction created successfully",
        transaction,
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        category::CategoryType,
        endpoints,
        envelope::Envelope,
        test_utils::{create_test_category, get_test_server, register_and_log_in},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let category = create_test_category(&server, &token, "Food", CategoryType::Expense).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "category_id": category.id,
                "amount": 12.5,
                "description": "Lunch",
                "date": "2024-03-15",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Envelope<Transaction>>();
        assert_eq!(body.message, "Transaction created successfully");
        let transaction = body.data.unwrap();
        assert_eq!(transaction.category_id, Some(category.id));
        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.description.as_deref(), Some("Lunch"));
        assert_eq!(transaction.date, date!(2024 - 03 - 15));
    }

    #[tokio::test]
    async fn accepts_values_as_previously_returned() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let category = create_test_category(&server, &token, "Food", CategoryType::Expense).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "category_id": category.id.to_string(),
                "amount": "12.50",
                "date": "2024-03-15T00:00:00.000Z",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Envelope<Transaction>>().data.unwrap();
        assert_eq!(transaction.category_id, Some(category.id));
        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.date, date!(2024 - 03 - 15));
    }

    #[tokio::test]
    async fn empty_description_is_stored_as_null() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let category = create_test_category(&server, &token, "Food", CategoryType::Expense).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "category_id": category.id,
                "amount": 3,
                "description": "",
                "date": "2024-03-15",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["data"]["description"], Value::Null);
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let category = create_test_category(&server, &token, "Food", CategoryType::Expense).await;

        for (amount, message) in [
            (json!(0), "Missing required fields"),
            (json!(-5), "Amount must be greater than 0"),
        ] {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .json(&json!({
                    "category_id": category.id,
                    "amount": amount,
                    "date": "2024-03-15",
                }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(
                response.json::<Envelope<Value>>(),
                Envelope::failure(message)
            );
        }
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected_before_category_lookup() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"category_id": 999, "amount": -5, "date": "2024-03-15"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let category = create_test_category(&server, &token, "Food", CategoryType::Expense).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({"category_id": category.id, "amount": 1, "date": "yesterday"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn category_must_exist_and_be_owned() {
        let (server, _) = get_test_server();
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        let category = create_test_category(&server, &alice, "Food", CategoryType::Expense).await;

        let not_owned = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&bob)
            .json(&json!({"category_id": category.id, "amount": 1, "date": "2024-03-15"}))
            .await;
        let missing = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&bob)
            .json(&json!({"category_id": category.id + 100, "amount": 1, "date": "2024-03-15"}))
            .await;

        not_owned.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            not_owned.json::<Envelope<Value>>(),
            Envelope::failure("Not authorized to use this category")
        );
        missing.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            missing.json::<Envelope<Value>>(),
            Envelope::failure("Category not found")
        );
    }
}
