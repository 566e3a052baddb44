//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, CategoryType},
    ownership::Owned,
    pagination::Page,
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The category of the transaction, `None` if the category was deleted.
    pub category_id: Option<CategoryId>,
    /// The amount of money spent or earned, always greater than zero.
    ///
    /// Whether it was spent or earned is decided by the category's type.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        category_id: CategoryId,
        amount: f64,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            category_id,
            amount,
            date,
            description: None,
        }
    }
}

impl Owned for Transaction {
    const NAME: &'static str = "Transaction";

    fn owner(&self) -> UserID {
        self.user_id
    }
}

/// A transaction along with the name and type of its category.
///
/// The category fields are `None` when the transaction has no category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category_name: Option<String>,
    pub category_type: Option<CategoryType>,
}

impl Owned for TransactionWithCategory {
    const NAME: &'static str = "Transaction";

    fn owner(&self) -> UserID {
        self.transaction.user_id
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::Transaction;
///
/// let transaction = Transaction::build(user_id, groceries.id, 45.99, date!(2025-01-15))
///     .description(Some("Weekly shop".to_owned()));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user the transaction belongs to.
    pub user_id: UserID,
    /// The category the transaction is recorded against.
    ///
    /// The caller must check that the category belongs to `user_id`.
    pub category_id: CategoryId,
    /// The monetary amount of the transaction, must be greater than zero.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// An optional human-readable description of the transaction.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// The full set of values stored for an existing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionChanges {
    pub category_id: Option<CategoryId>,
    pub amount: f64,
    pub description: Option<String>,
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// Deleting a user deletes their transactions. Deleting a category keeps its
/// transactions and clears their category.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date)",
        (),
    )?;

    Ok(())
}

const SELECT_COLUMNS: &str = "id, user_id, category_id, amount, description, date";

/// Map a row of [SELECT_COLUMNS] to a transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
    })
}

const SELECT_WITH_CATEGORY: &str = "SELECT t.id, t.user_id, t.category_id, t.amount, t.description, t.date,
        c.name, c.type
    FROM \"transaction\" t
    LEFT JOIN category c ON t.category_id = c.id";

fn map_row_with_category(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    Ok(TransactionWithCategory {
        transaction: map_transaction_row(row)?,
        category_name: row.get(6)?,
        category_type: row.get(7)?,
    })
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error, e.g. the amount is
/// not positive or the category does not exist.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, category_id, amount, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                builder.user_id.as_i64(),
                builder.category_id,
                builder.amount,
                builder.description,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction and its category by the transaction's `id`, regardless of who owns it.
///
/// Returns `None` if there is no such transaction.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<TransactionWithCategory>, Error> {
    connection
        .prepare(&format!("{SELECT_WITH_CATEGORY} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_row_with_category)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve a page of the transactions owned by `user_id`, newest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_page(
    user_id: UserID,
    page: Page,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WITH_CATEGORY}
            WHERE t.user_id = ?1
            ORDER BY t.date DESC, t.id DESC
            LIMIT ?2 OFFSET ?3"
        ))?
        .query_map((user_id.as_i64(), page.limit, page.offset), map_row_with_category)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Retrieve every transaction owned by `user_id` dated between `start` and `end` inclusive,
/// newest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_in_range(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WITH_CATEGORY}
            WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3
            ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map((user_id.as_i64(), start, end), map_row_with_category)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Overwrite the transaction `id` owned by `user_id` with `changes`.
///
/// Returns `None` if no transaction matched both.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
            SET category_id = ?1, amount = ?2, description = ?3, date = ?4
            WHERE id = ?5 AND user_id = ?6
            RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                changes.category_id,
                changes.amount,
                changes.description,
                changes.date,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .optional()
        .map_err(|error| error.into())
}

/// Delete the transaction `id` owned by `user_id`.
///
/// Returns `false` if no transaction matched both.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(rows_affected > 0)
}

// ============================================================================
// TESTS
// ============================================================================
