//! Code for creating the users table and registering and verifying accounts.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, auth::password::PasswordHash, auth::session::Identity};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The unique username chosen at registration.
    pub username: Identity,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the users table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_users_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new account into the database.
///
/// No password strength or format checks are applied here.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if `username` is already registered,
/// or [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        (username, password_hash.as_ref()),
    )?;

    Ok(User {
        username: Identity::new(username),
        password_hash,
    })
}

/// Get the account registered under `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered account.
/// - there was an error trying to access the store.
pub fn get_user(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT username, password FROM users WHERE username = :username")?
        .query_row(&[(":username", username)], |row| {
            let username: String = row.get(0)?;
            let raw_password_hash: String = row.get(1)?;

            Ok(User {
                username: Identity::new(username),
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            })
        })
        .map_err(|error| error.into())
}

/// Check `username` and `password` against the stored accounts and return
/// the matching identity.
///
/// An unknown username and a wrong password both produce
/// [Error::InvalidCredentials]: the caller cannot tell which usernames are
/// registered.
///
/// # Errors
///
/// Returns [Error::HashingError] if the underlying hash comparison failed
/// unexpectedly, and [Error::SqlError] for other storage errors.
pub fn verify_user(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<Identity, Error> {
    let user = match get_user(username, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match user.password_hash.verify(password) {
        Ok(true) => Ok(user.username),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// Replace the stored password hash for `username`.
///
/// Used by the offline admin tool; there is no HTTP route for this.
///
/// # Errors
///
/// Returns [Error::NotFound] if `username` is not a registered account.
pub fn update_password(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_changed = connection.execute(
        "UPDATE users SET password = ?1 WHERE username = ?2",
        (password_hash.as_ref(), username),
    )?;

    if rows_changed == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
