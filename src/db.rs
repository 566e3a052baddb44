//! The handle to the application's SQLite database and the schema setup.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState, Error, auth::create_user_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// A shared handle to the application database.
///
/// Cloning the handle is cheap and all clones refer to the same connection.
/// Request handlers check the connection out with [Database::lock] and must
/// not hold it across an `.await`.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file at `path` and make sure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let connection = Connection::open(path)?;

        Self::from_connection(connection)
    }

    /// Create a database that only lives in memory, mostly useful for tests.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, Error> {
        let connection = Connection::open_in_memory()?;

        Self::from_connection(connection)
    }

    /// Wrap an existing connection, creating the schema if needed.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn from_connection(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Acquire exclusive access to the connection.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned.
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Check that the database answers a trivial query.
    pub fn ping(&self) -> bool {
        let connection = match self.lock() {
            Ok(connection) => connection,
            Err(_) => return false,
        };

        match connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
            Ok(value) => value == 1,
            Err(error) => {
                tracing::error!("Database health check failed: {error}");
                false
            }
        }
    }
}

/// The state needed by handlers that only talk to the database.
#[derive(Debug, Clone)]
pub struct DatabaseState {
    pub db: Database,
}

impl FromRef<AppState> for DatabaseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// Create the tables for the domain models and enable foreign key enforcement.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction to take effect.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = rusqlite::Transaction::new_unchecked(
        connection,
        rusqlite::TransactionBehavior::Exclusive,
    )?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
