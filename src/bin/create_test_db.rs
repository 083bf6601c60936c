use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendwise::{
    Identity, LedgerEntry, PasswordHash, append_entry, create_user, initialize_db,
};

/// A utility for creating a test database for the SpendWise server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'demo' with password 'test'...");

    let password_hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;
    let user = create_user("demo", password_hash, &conn)?;

    println!("Seeding ledger entries...");

    let today = OffsetDateTime::now_utc().date();
    let identity: Identity = user.username;

    for weeks_ago in (0..12u8).rev() {
        let date = today - Duration::weeks(weeks_ago as i64);
        let bills = 8_000.0 + 500.0 * f64::from(weeks_ago % 4);
        let travel = 1_500.0 + 250.0 * f64::from(weeks_ago % 3);
        let misc = 900.0 + 150.0 * f64::from(weeks_ago % 5);

        let entry = LedgerEntry::new(identity.clone(), date, 50_000.0, bills, travel, misc);
        append_entry(&entry, &conn)?;
    }

    println!("Success!");

    Ok(())
}
