//! Defines the app level error type and its conversion to enveloped JSON responses.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::envelope::Envelope;

/// The message sent to clients for any error that should not leak details.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request was missing a required field or had a malformed value.
    ///
    /// The message is shown to the client as is.
    #[error("{0}")]
    Validation(String),

    /// A unique value (e.g., an email address) is already used by another user.
    ///
    /// Reported with the status code 400.
    #[error("{0}")]
    Conflict(String),

    /// The email and password did not match a registered user.
    ///
    /// Both an unknown email and a wrong password produce this error so that
    /// clients cannot probe for registered email addresses.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request did not include a bearer token.
    #[error("No token provided")]
    MissingToken,

    /// The bearer token was malformed, had a bad signature or has expired.
    #[error("Invalid token")]
    InvalidToken,

    /// The caller is authenticated but does not own the requested resource.
    #[error("{0}")]
    Forbidden(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("{0}")]
    NotFound(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The signed token could not be created.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// The HTTP status code that represents this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::MissingToken | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message to show the client.
    ///
    /// Internal errors are replaced with [SERVER_ERROR_MESSAGE].
    pub fn client_message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            SERVER_ERROR_MESSAGE.to_owned()
        } else {
            self.to_string()
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::Conflict("Email already in use".to_owned())
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::Conflict("Username already in use".to_owned())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Resource not found".to_owned()),
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status, Envelope::<()>::failure(self.client_message())).into_response()
    }
}
