//! Parsing of the transaction request bodies and query strings.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, de};
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{Error, category::CategoryId};

/// The format of dates in requests, e.g. "2025-01-31".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The body of a request to create or update a transaction.
///
/// Zero and empty values are treated as missing, except for `description`
/// where only a missing key counts as missing.
///
/// `category_id` and `amount` may be sent as numbers or as numeric strings, e.g. "12.50".
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default, deserialize_with = "deserialize_number")]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub amount: Option<f64>,
    /// `None` if the key is absent, `Some(None)` if the key is `null`.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub date: Option<String>,
}

impl TransactionForm {
    /// The category ID if it was given and is not zero.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id.filter(|id| *id != 0)
    }

    /// The amount if it was given and is not zero.
    pub fn amount(&self) -> Option<f64> {
        self.amount.filter(|amount| *amount != 0.0)
    }

    /// The raw date if it was given and is not empty.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|date| !date.is_empty())
    }

    /// Whether the description was given with a non-empty value.
    pub fn has_description(&self) -> bool {
        matches!(&self.description, Some(Some(description)) if !description.is_empty())
    }
}

/// Distinguishes a `null` field from a missing one when used with `#[serde(default)]`.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

/// Accepts a JSON number, a numeric string or `null`. An empty string counts as missing.
fn deserialize_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(number)) => Ok(Some(number)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|error| de::Error::custom(format!("invalid number {text:?}: {error}"))),
    }
}

/// Check that `amount` is greater than zero.
///
/// # Errors
/// Returns [Error::Validation] if it is not.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::Validation("Amount must be greater than 0".to_owned()))
    }
}

/// Parse a date in the format "YYYY-MM-DD".
///
/// An RFC 3339 timestamp such as "2024-03-15T00:00:00.000Z" is also accepted and
/// its date part is used.
///
/// # Errors
/// Returns [Error::Validation] naming `field` if the date is malformed.
pub fn parse_date(field: &str, raw: &str) -> Result<Date, Error> {
    Date::parse(raw, DATE_FORMAT)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339).map(|timestamp| timestamp.date()))
        .map_err(|_| Error::Validation(format!("{field} must be a date in the format YYYY-MM-DD")))
}
