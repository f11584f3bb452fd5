use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use expense_tracker::{Category, Transaction, UserID, create_transaction, initialize_db};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the user that owns the generated transactions.
    #[arg(long, default_value_t = 1)]
    owner: i64,

    /// The number of months of transactions to generate, ending this month.
    #[arg(long, default_value_t = 12)]
    months: i64,
}

/// The categories, amounts in cents, and descriptions of the monthly transactions.
const MONTHLY_TRANSACTIONS: [(Category, i64, &str); 8] = [
    (Category::Salary, 520_000, "Monthly pay"),
    (Category::Freelance, 45_000, "Side project"),
    (Category::Housing, 180_000, "Rent"),
    (Category::Food, 62_350, "Groceries"),
    (Category::Utilities, 21_099, "Power and internet"),
    (Category::Transportation, 12_000, "Bus pass"),
    (Category::Entertainment, 8_950, "Concert tickets"),
    (Category::Healthcare, 4_500, "Pharmacy"),
];

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

    let owner = UserID::new(args.owner);
    let now = OffsetDateTime::now_utc();

    println!(
        "Creating {} months of transactions for user {owner}...",
        args.months
    );

    for month in 0..args.months {
        let occurred_at = now - Duration::days(30 * month);

        for (i, (category, cents, description)) in MONTHLY_TRANSACTIONS.iter().enumerate() {
            // Vary the amounts a little so the trends are not flat.
            let cents = cents + (month * 731 + i as i64 * 97) % 5_000;
            let transaction = Transaction::build(
                category.kind(),
                Decimal::new(cents, 2),
                *category,
                description,
            )
            .occurred_at(Some(occurred_at - Duration::days(i as i64)));

            create_transaction(owner, transaction, &conn)?;
        }
    }

    println!("Success!");

    Ok(())
}
