//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryType},
};

/// Create the category table.
///
/// Deleting a user deletes their categories.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id)",
        (),
    )?;

    Ok(())
}

/// Create a category owned by `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred, e.g. the user does not exist.
pub fn create_category(
    user_id: UserID,
    name: &str,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name, type) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), name, category_type),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id,
        name: name.to_owned(),
        category_type,
    })
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        category_type: row.get(3)?,
    })
}

/// Retrieve the category with `id`, regardless of who owns it.
///
/// Returns `None` if there is no such category.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn get_category(id: CategoryId, connection: &Connection) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM category WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve the categories owned by `user_id` sorted by name, optionally only those of
/// `category_type`.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn get_categories(
    user_id: UserID,
    category_type: Option<CategoryType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
            WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
            ORDER BY name ASC",
        )?
        .query_map((user_id.as_i64(), category_type), map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Overwrite the name and type of the category `id` owned by `user_id`.
///
/// Returns `None` if no category matched both.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn update_category(
    id: CategoryId,
    user_id: UserID,
    name: &str,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, type = ?2 WHERE id = ?3 AND user_id = ?4",
        (name, category_type, id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Ok(None);
    }

    Ok(Some(Category {
        id,
        user_id,
        name: name.to_owned(),
        category_type,
    }))
}

/// Delete the category `id` owned by `user_id`.
///
/// Transactions in the category are kept and lose their category.
/// Returns `false` if no category matched both.
///
/// # Errors
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn delete_category(
    id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    Ok(rows_affected > 0)
}
