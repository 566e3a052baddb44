//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The password hash must never be sent to clients, use [User::public] for responses.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user chose.
    pub username: String,
    /// The unique email address used to log in.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the account was registered.
    pub created_at: OffsetDateTime,
}

impl User {
    /// The fields of the user that are safe to show the user.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }

    /// The fields of the user that are embedded in auth tokens.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// A user without their password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserID,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Who a request was made by, as recorded in their token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserID,
    pub username: String,
    pub email: String,
}

/// The fields of a user that may be changed after registration.
///
/// Fields that are `None` keep their current value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<PasswordHash>,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns an [Error::Conflict] if the username or email is taken, or an [Error::SqlError] if
/// another SQL related error occurred.
pub fn create_user(
    username: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let now = OffsetDateTime::now_utc();
    let created_at = now.replace_nanosecond(0).unwrap_or(now);

    connection.execute(
        "INSERT INTO user (username, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
        (username, email, password_hash.as_ref(), created_at),
    )?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash,
        created_at,
    })
}

const SELECT_USER: &str = "SELECT id, username, email, password, created_at FROM user";

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at: row.get(4)?,
    })
}

/// Get the user from the database with an ID equal to `user_id`, or `None` if there is no such user.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Get the user registered with `email`, or `None` if there is no such user.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE email = :email"))?
        .query_row(&[(":email", email)], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Get the user registered with `username`, or `None` if there is no such user.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_username(
    username: &str,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE username = :username"))?
        .query_row(&[(":username", username)], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Overwrite the fields of the user with `user_id` that are set in `update`.
///
/// Returns the updated user, or `None` if there is no user with `user_id`.
///
/// # Errors
///
/// Returns an [Error::Conflict] if the new username or email is taken, or an
/// [Error::SqlError] if another SQL related error occurred.
pub fn update_user(
    user_id: UserID,
    update: UserUpdate,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET
            username = COALESCE(?1, username),
            email = COALESCE(?2, email),
            password = COALESCE(?3, password)
        WHERE id = ?4",
        (
            update.username,
            update.email,
            update.password_hash.map(|hash| hash.to_string()),
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Ok(None);
    }

    get_user_by_id(user_id, connection)
}

/// Delete the user with `user_id` along with everything they own.
///
/// Returns `false` if there was no user to delete.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<bool, Error> {
    let rows_affected =
        connection.execute("DELETE FROM user WHERE id = ?1", (user_id.as_i64(),))?;

    Ok(rows_affected > 0)
}
