//! Implements a struct that holds the state of the REST server.

use std::{sync::Arc, time::Instant};

use crate::{
    auth::{CredentialHasher, TokenService},
    db::Database,
    pagination::PaginationConfig,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The handle to the application database.
    pub db: Database,

    /// Hashes and checks user passwords.
    pub hasher: Arc<dyn CredentialHasher>,

    /// Issues and verifies the bearer tokens used for authentication.
    pub token_service: TokenService,

    /// The config that controls how to page through lists of data.
    pub pagination_config: PaginationConfig,

    /// When the server started, used to report uptime.
    pub started_at: Instant,
}

impl AppState {
    /// Create a new [AppState] from the already initialized services.
    pub fn new(
        db: Database,
        hasher: Arc<dyn CredentialHasher>,
        token_service: TokenService,
        pagination_config: PaginationConfig,
    ) -> Self {
        Self {
            db,
            hasher,
            token_service,
            pagination_config,
            started_at: Instant::now(),
        }
    }
}
