use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use expense_tracker::{
    BcryptHasher, CategoryType, CredentialHasher, PasswordHash, Transaction, create_category,
    create_transaction, create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year to create the sample transactions in.
    #[arg(long, default_value_t = 2024)]
    year: i32,
}

/// Create and populate a database for manual testing.
///
/// The database has one user, "demo@example.com" with the password "password123", a few
/// categories and a year of monthly transactions.
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

    println!("Creating test user...");

    let password_hash: PasswordHash =
        BcryptHasher::new(PasswordHash::DEFAULT_COST).hash("password123")?;
    let user = create_user("demo", "demo@example.com", password_hash, &conn)?;

    println!("Creating categories...");

    let salary = create_category(user.id, "Salary", CategoryType::Income, &conn)?;
    let groceries = create_category(user.id, "Groceries", CategoryType::Expense, &conn)?;
    let rent = create_category(user.id, "Rent", CategoryType::Expense, &conn)?;

    println!("Creating transactions for {}...", args.year);

    for month in 1..=12u8 {
        let month = Month::try_from(month)?;
        let payday = Date::from_calendar_date(args.year, month, 1)?;
        let shopping_day = Date::from_calendar_date(args.year, month, 15)?;

        for transaction in [
            Transaction::build(user.id, salary.id, 4200.0, payday)
                .description(Some("Monthly salary".to_owned())),
            Transaction::build(user.id, rent.id, 1650.0, payday)
                .description(Some("Rent".to_owned())),
            Transaction::build(
                user.id,
                groceries.id,
                120.0 + f64::from(u8::from(month)) * 7.5,
                shopping_day,
            ),
        ] {
            create_transaction(transaction, &conn)?;
        }
    }

    println!("Success!");

    Ok(())
}
