//! Code for creating the summary table and appending and listing entries.

use rusqlite::{Connection, Row};

use crate::{Error, auth::Identity, ledger::entry::LedgerEntry};

/// Create the summary table that holds the ledger entries.
///
/// There is deliberately no uniqueness constraint on `(username, date)`:
/// multiple entries per day accumulate.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_summary_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS summary (
                username TEXT NOT NULL,
                date TEXT NOT NULL,
                budget REAL NOT NULL,
                bills REAL NOT NULL,
                travel REAL NOT NULL,
                misc REAL NOT NULL,
                balance REAL NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert one entry into the summary table.
///
/// The insert is unconditional: there is no idempotence key, so submitting
/// the same entry twice stores two rows.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the insert failed.
pub fn append_entry(entry: &LedgerEntry, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO summary (username, date, budget, bills, travel, misc, balance)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            entry.username.as_str(),
            entry.date,
            entry.budget,
            entry.bills,
            entry.travel,
            entry.misc,
            entry.balance,
        ),
    )?;

    Ok(())
}

/// Get all entries belonging to `identity` in insertion order.
///
/// Returns an empty vec, never an error, when the identity has no rows.
/// Callers that need a different order (e.g. by date for reports) sort the
/// result themselves.
///
/// # Errors
///
/// This function will return an error if there is an SQL error.
pub fn get_entries(identity: &Identity, connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(
            "SELECT username, date, budget, bills, travel, misc, balance
                FROM summary WHERE username = :username ORDER BY rowid",
        )?
        .query_map(&[(":username", identity.as_str())], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::SqlError))
        .collect()
}

fn map_row(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    let username: String = row.get(0)?;

    Ok(LedgerEntry {
        username: Identity::new(username),
        date: row.get(1)?,
        budget: row.get(2)?,
        bills: row.get(3)?,
        travel: row.get(4)?,
        misc: row.get(5)?,
        balance: row.get(6)?,
    })
}

#[cfg(test)]
mod store_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{auth::Identity, ledger::entry::LedgerEntry};

    use super::{append_entry, create_summary_table, get_entries};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_summary_table(&conn).expect("Could not create summary table");

        conn
    }

    fn sample_entry(username: &str) -> LedgerEntry {
        LedgerEntry::new(
            Identity::new(username),
            date!(2024 - 01 - 01),
            1000.0,
            200.0,
            100.0,
            50.0,
        )
    }

    #[test]
    fn append_then_list_round_trips_all_fields() {
        let conn = get_db_connection();
        let entry = sample_entry("alice");

        append_entry(&entry, &conn).unwrap();
        let entries = get_entries(&Identity::new("alice"), &conn).unwrap();

        assert_eq!(entries, vec![entry]);
        assert_eq!(entries[0].balance, 650.0);
    }

    #[test]
    fn list_returns_empty_vec_for_identity_with_no_rows() {
        let conn = get_db_connection();

        let entries = get_entries(&Identity::new("alice"), &conn).unwrap();

        assert_eq!(entries, vec![]);
    }

    #[test]
    fn list_never_returns_another_identitys_rows() {
        let conn = get_db_connection();
        append_entry(&sample_entry("alice"), &conn).unwrap();
        append_entry(&sample_entry("bob"), &conn).unwrap();

        let entries = get_entries(&Identity::new("alice"), &conn).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(
            entries
                .iter()
                .all(|entry| entry.username == Identity::new("alice"))
        );
    }

    #[test]
    fn duplicate_submissions_accumulate() {
        let conn = get_db_connection();
        let entry = sample_entry("alice");

        append_entry(&entry, &conn).unwrap();
        append_entry(&entry, &conn).unwrap();

        let entries = get_entries(&Identity::new("alice"), &conn).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let conn = get_db_connection();
        let first = LedgerEntry::new(
            Identity::new("alice"),
            date!(2024 - 02 - 02),
            500.0,
            100.0,
            0.0,
            0.0,
        );
        let second = LedgerEntry::new(
            Identity::new("alice"),
            date!(2024 - 01 - 01),
            800.0,
            0.0,
            50.0,
            25.0,
        );

        append_entry(&first, &conn).unwrap();
        append_entry(&second, &conn).unwrap();

        let entries = get_entries(&Identity::new("alice"), &conn).unwrap();
        assert_eq!(entries, vec![first, second]);
    }
}
