use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use pinjaman_rs::{Currency, NewLoan, create_loan, initialize_db};

/// A utility for creating a test database for the pinjaman_rs web server.
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

    println!("Creating test loans...");

    let test_loans = [
        NewLoan {
            borrower: "Alice".to_string(),
            principal: 1_000_000.0,
            currency: Currency::Idr,
            interest_rate: 5.0,
        },
        NewLoan {
            borrower: "Bob".to_string(),
            principal: 2000.0,
            currency: Currency::Thb,
            interest_rate: 10.0,
        },
        NewLoan {
            borrower: "Citra".to_string(),
            principal: 250_000.0,
            currency: Currency::Idr,
            interest_rate: 0.0,
        },
    ];

    for loan in test_loans {
        create_loan(loan, &conn)?;
    }

    println!("Success!");

    Ok(())
}
