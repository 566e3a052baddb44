//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The maximum number of rows to return when not specified in a request.
    pub default_limit: i64,
    /// The number of rows to skip when not specified in a request.
    pub default_offset: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            default_offset: 0,
        }
    }
}

/// A window into an ordered list of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PaginationConfig {
    /// Parse the raw `limit` and `offset` query parameters, falling back to the defaults for
    /// those that are absent or empty.
    ///
    /// # Errors
    /// Returns [Error::Validation] if either parameter is not a non-negative integer.
    pub fn page(&self, limit: Option<&str>, offset: Option<&str>) -> Result<Page, Error> {
        Ok(Page {
            limit: parse_count("limit", limit)?.unwrap_or(self.default_limit),
            offset: parse_count("offset", offset)?.unwrap_or(self.default_offset),
        })
    }
}

fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<i64>, Error> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => match raw.parse::<i64>() {
            Ok(count) if count >= 0 => Ok(Some(count)),
            _ => Err(Error::Validation(format!(
                "{name} must be a non-negative integer"
            ))),
        },
    }
}
