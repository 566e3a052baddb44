//! Liveness routes that do not require authentication.

use std::time::Instant;

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AppState, db::Database};

/// The plain text body served at `/`.
pub const BANNER: &str = "Expense Tracker API is running";

/// The state needed for the health check.
#[derive(Debug, Clone)]
pub struct HealthState {
    pub db: Database,
    pub started_at: Instant,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            started_at: state.started_at,
        }
    }
}

/// The status of the services the server depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub database: bool,
}

/// The body of a health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Seconds since the server started.
    pub uptime: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub services: ServiceStatus,
}

/// Report uptime and whether the database answers.
///
/// Responds with 503 Service Unavailable if the database does not.
pub async fn get_health(State(state): State<HealthState>) -> Response {
    let database = state.db.ping();
    let report = HealthReport {
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64,
        services: ServiceStatus { database },
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report)).into_response()
}

pub async fn get_root() -> &'static str {
    BANNER
}
