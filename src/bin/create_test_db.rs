use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use finance_tracker::{Amount, Transaction, count_transactions, create_transaction, initialize_db};

/// A utility for creating a test database for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of transactions to create, ending with the current month.
    #[arg(long, short, default_value_t = 8)]
    months: u32,
}

/// Recurring transactions: day of month, amount in cents and description.
const MONTHLY_TRANSACTIONS: [(u8, i64, &str); 6] = [
    (1, 420_000, "Salary"),
    (2, -180_000, "Rent"),
    (5, -8_734, "Groceries"),
    (12, -4_599, "Electricity"),
    (19, -6_210, "Groceries"),
    (26, -1_550, "Movie tickets"),
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

    println!("Creating transactions for the last {} months...", args.months);

    let today = OffsetDateTime::now_utc().date();
    let mut month_start = today.replace_day(1)?;

    for _ in 0..args.months {
        for (day, cents, description) in MONTHLY_TRANSACTIONS {
            let date = month_start.replace_day(day)?;

            if date > today {
                continue;
            }

            create_transaction(
                Transaction::build(Amount::from_cents(cents), date, description),
                &conn,
            )?;
        }

        month_start = previous_month(month_start)?;
    }

    println!("Created {} transactions.", count_transactions(&conn)?);
    println!("Success!");

    Ok(())
}

fn previous_month(month_start: Date) -> Result<Date, Box<dyn Error>> {
    let last_day_of_previous_month = month_start - Duration::days(1);

    Ok(last_day_of_previous_month.replace_day(1)?)
}
