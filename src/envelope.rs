//! The uniform `{success, message, data}` response body and the request extractors
//! whose rejections are reported inside that body.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The body of every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human readable description of the outcome.
    pub message: String,
    /// The payload, `null` on failure and for operations without a result.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A successful outcome carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A successful outcome without a payload.
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// A failed outcome, `data` is always `null`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T> IntoResponse for Envelope<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Respond with `status` and a successful envelope around `data`.
pub fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (status, Envelope::success(message, data)).into_response()
}

/// Respond with 200 OK and a successful envelope whose `data` is `null`.
pub fn respond_empty(message: &str) -> Response {
    (StatusCode::OK, Envelope::<()>::success_empty(message)).into_response()
}

/// A JSON body extractor that reports malformed bodies as [Error::Validation].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// A query string extractor that reports malformed queries as [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// A path parameter extractor that reports malformed parameters as [Error::Validation].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

/// Treat an empty string the same as a missing field.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Read a response body as an envelope.
#[cfg(test)]
pub(crate) async fn read_envelope<T>(response: Response) -> Envelope<T>
where
    T: serde::de::DeserializeOwned,
{
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not an envelope")
}
