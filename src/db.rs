//! Database initialization for the application.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, loan::create_loan_table};

/// Add the tables for the application's domain models to the database.
///
/// # Errors
/// Returns an error if a table could not be created or if there is some
/// other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_loan_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
