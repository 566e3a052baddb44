//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// The root route which reports that the server is up.
pub const ROOT: &str = "/";
/// The route for checking the health of the server and its database.
pub const HEALTH: &str = "/health";

/// The route for registering a new user.
pub const REGISTER: &str = "/api/users/register";
/// The route for exchanging credentials for a token.
pub const LOG_IN: &str = "/api/users/login";
/// The route for checking that a token is still valid.
pub const VALIDATE_TOKEN: &str = "/api/users/validate-token";
/// The route for reading and updating the caller's profile.
pub const PROFILE: &str = "/api/users/profile";
/// The route for deleting the caller's account.
pub const ACCOUNT: &str = "/api/users/account";

/// The route to access categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to access transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the sum of transactions per category over a date range.
pub const CATEGORY_TOTALS: &str = "/api/transactions/analysis/category-totals";
/// The route for the income and expense totals of each month in a year.
pub const MONTHLY_TOTALS: &str = "/api/transactions/analysis/monthly";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
