//! Database initialization for the application's SQLite file.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, auth::create_users_table, ledger::create_summary_table};

/// Create the application's tables if they do not already exist.
///
/// The tables are created inside a single exclusive transaction so that two
/// processes racing to initialize the same database file cannot observe a
/// half-created schema.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_users_table(&transaction)?;
    create_summary_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
