//! Reports that sum the caller's transactions by category and by month.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::{Claims, UserID},
    category::{CategoryId, CategoryType},
    db::DatabaseState,
    envelope::{ApiQuery, non_empty, respond},
    transaction::form::parse_date,
};

/// The sum of a user's transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub total: f64,
}

/// The sum of a user's transactions of one type in one month, as grouped by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTypeTotal {
    /// The calendar month, 1 to 12.
    pub month: u8,
    pub category_type: CategoryType,
    pub total: f64,
}

/// Income and expenses for one month of a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: u8,
    pub income: f64,
    pub expense: f64,
}

/// Sum the transactions owned by `user_id` dated between `start` and `end` inclusive, per category.
///
/// Categories without transactions in the range are left out. Results are ordered by category
/// type, then by descending total.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_category_totals(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.type, SUM(t.amount) AS total
            FROM \"transaction\" t
            INNER JOIN category c ON t.category_id = c.id
            WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3
            GROUP BY c.id, c.name, c.type
            ORDER BY c.type, total DESC",
        )?
        .query_map((user_id.as_i64(), start, end), |row| {
            Ok(CategoryTotal {
                id: row.get(0)?,
                name: row.get(1)?,
                category_type: row.get(2)?,
                total: row.get(3)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

/// Sum the transactions owned by `user_id` in `year`, grouped by month and category type.
///
/// Only the (month, type) pairs that have transactions are returned.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_month_type_totals(
    user_id: UserID,
    year: i32,
    connection: &Connection,
) -> Result<Vec<MonthTypeTotal>, Error> {
    connection
        .prepare(
            "SELECT CAST(strftime('%m', t.date) AS INTEGER) AS month, c.type, SUM(t.amount)
            FROM \"transaction\" t
            INNER JOIN category c ON t.category_id = c.id
            WHERE t.user_id = ?1 AND strftime('%Y', t.date) = ?2
            GROUP BY month, c.type
            ORDER BY month",
        )?
        .query_map((user_id.as_i64(), format!("{year:04}")), |row| {
            Ok(MonthTypeTotal {
                month: row.get(0)?,
                category_type: row.get(1)?,
                total: row.get(2)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

/// Spread sparse (month, type) totals over all twelve months, filling the gaps with zero.
pub fn densify_monthly_totals(totals: &[MonthTypeTotal]) -> Vec<MonthlyTotal> {
    let mut months: Vec<MonthlyTotal> = (1..=12)
        .map(|month| MonthlyTotal {
            month,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for total in totals {
        let Some(slot) = months.get_mut(usize::from(total.month).wrapping_sub(1)) else {
            tracing::warn!("Ignoring total for invalid month {}", total.month);
            continue;
        };

        match total.category_type {
            CategoryType::Income => slot.income += total.total,
            CategoryType::Expense => slot.expense += total.total,
        }
    }

    months
}

/// The query parameters for the category totals report.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// The query parameters for the monthly report.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

/// A route handler for the caller's totals per category within a date range.
pub async fn category_totals_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<Response, Error> {
    let (Some(start_date), Some(end_date)) =
        (non_empty(query.start_date), non_empty(query.end_date))
    else {
        return Err(Error::Validation(
            "Start date and end date are required".to_owned(),
        ));
    };
    let start = parse_date("start_date", &start_date)?;
    let end = parse_date("end_date", &end_date)?;

    let totals = get_category_totals(claims.id, start, end, &*state.db.lock()?)?;

    Ok(respond(
        StatusCode::OK,
        "Category totals retrieved successfully",
        totals,
    ))
}

/// A route handler for the caller's income and expenses in each month of a year.
///
/// Always responds with twelve months, ordered from January.
pub async fn monthly_totals_endpoint(
    State(state): State<DatabaseState>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<YearQuery>,
) -> Result<Response, Error> {
    let Some(raw_year) = non_empty(query.year) else {
        return Err(Error::Validation("Year parameter is required".to_owned()));
    };
    let year = parse_year(&raw_year)?;

    let totals = get_month_type_totals(claims.id, year, &*state.db.lock()?)?;

    Ok(respond(
        StatusCode::OK,
        "Monthly totals retrieved successfully",
        densify_monthly_totals(&totals),
    ))
}

fn parse_year(raw: &str) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (0..=9999).contains(year))
        .ok_or_else(|| Error::Validation("Year must be an integer between 0 and 9999".to_owned()))
}


#[cfg(test)]
mod endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        category::CategoryType,
        endpoints,
        envelope::Envelope,
        test_utils::{
            create_test_category, create_test_transaction, get_test_server, register_and_log_in,
        },
    };

    use super::{CategoryTotal, MonthlyTotal};

    #[tokio::test]
    async fn monthly_totals_are_dense() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let salary = create_test_category(&server, &token, "Salary", CategoryType::Income).await;
        let food = create_test_category(&server, &token, "Food", CategoryType::Expense).await;
        create_test_transaction(&server, &token, salary.id, 100.0, date!(2024 - 03 - 01)).await;
        create_test_transaction(&server, &token, food.id, 40.0, date!(2024 - 03 - 20)).await;
        create_test_transaction(&server, &token, food.id, 7.0, date!(2023 - 03 - 20)).await;

        let response = server
            .get(endpoints::MONTHLY_TOTALS)
            .add_query_param("year", 2024)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body = response.json::<Envelope<Vec<MonthlyTotal>>>();
        assert_eq!(body.message, "Monthly totals retrieved successfully");
        let totals = body.data.unwrap();
        assert_eq!(totals.len(), 12);
        assert_eq!(
            totals[2],
            MonthlyTotal {
                month: 3,
                income: 100.0,
                expense: 40.0
            }
        );
        assert!(
            totals
                .iter()
                .filter(|total| total.month != 3)
                .all(|total| total.income == 0.0 && total.expense == 0.0)
        );
    }

    #[tokio::test]
    async fn monthly_totals_require_year() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .get(endpoints::MONTHLY_TOTALS)
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::failure("Year parameter is required")
        );
    }

    #[tokio::test]
    async fn category_totals_group_and_order_by_type_then_total() {
        let (server, _) = get_test_server();
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        let salary = create_test_category(&server, &alice, "Salary", CategoryType::Income).await;
        let food = create_test_category(&server, &alice, "Food", CategoryType::Expense).await;
        let rent = create_test_category(&server, &alice, "Rent", CategoryType::Expense).await;
        let unused = create_test_category(&server, &alice, "Unused", CategoryType::Expense).await;
        let bobs = create_test_category(&server, &bob, "Food", CategoryType::Expense).await;
        create_test_transaction(&server, &alice, food.id, 10.0, date!(2024 - 01 - 01)).await;
        create_test_transaction(&server, &alice, food.id, 15.0, date!(2024 - 01 - 31)).await;
        create_test_transaction(&server, &alice, rent.id, 800.0, date!(2024 - 01 - 05)).await;
        create_test_transaction(&server, &alice, salary.id, 3000.0, date!(2024 - 01 - 15)).await;
        create_test_transaction(&server, &alice, unused.id, 1.0, date!(2024 - 02 - 01)).await;
        create_test_transaction(&server, &bob, bobs.id, 99.0, date!(2024 - 01 - 10)).await;

        let response = server
            .get(endpoints::CATEGORY_TOTALS)
            .add_query_param("start_date", "2024-01-01")
            .add_query_param("end_date", "2024-01-31")
            .authorization_bearer(&alice)
            .await;

        response.assert_status_ok();
        let body = response.json::<Envelope<Vec<CategoryTotal>>>();
        assert_eq!(body.message, "Category totals retrieved successfully");
        assert_eq!(
            body.data.unwrap(),
            vec![
                CategoryTotal {
                    id: rent.id,
                    name: "Rent".to_owned(),
                    category_type: CategoryType::Expense,
                    total: 800.0,
                },
                CategoryTotal {
                    id: food.id,
                    name: "Food".to_owned(),
                    category_type: CategoryType::Expense,
                    total: 25.0,
                },
                CategoryTotal {
                    id: salary.id,
                    name: "Salary".to_owned(),
                    category_type: CategoryType::Income,
                    total: 3000.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn category_totals_require_both_dates() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;

        let response = server
            .get(endpoints::CATEGORY_TOTALS)
            .add_query_param("start_date", "2024-01-01")
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Envelope<Value>>(),
            Envelope::failure("Start date and end date are required")
        );
    }
}
