//! Core loan domain types and database operations.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, currency::Currency};

/// Database identifier for a loan.
pub type LoanId = i64;

/// A record of money lent to a borrower.
///
/// The serialized field names follow the wire format of the JSON API, which
/// matches the columns of the `pinjaman` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    /// The id for the loan.
    pub id: LoanId,
    /// The name of the person who borrowed the money.
    #[serde(rename = "nama_peminjam")]
    pub borrower: String,
    /// The amount lent, before interest.
    #[serde(rename = "jumlah_pinjaman")]
    pub principal: f64,
    /// The currency the loan is denominated in.
    #[serde(rename = "mata_uang")]
    pub currency: Currency,
    /// The interest rate as a percentage of the principal.
    #[serde(rename = "tingkat_bunga")]
    pub interest_rate: f64,
    /// When the loan was recorded. Assigned by the store at creation.
    #[serde(rename = "tanggal_pinjaman", with = "time::serde::rfc3339")]
    pub loan_date: OffsetDateTime,
}

impl Loan {
    /// The interest owed on the loan. Always derived, never stored.
    pub fn interest(&self) -> f64 {
        self.principal * self.interest_rate / 100.0
    }

    /// The principal plus the interest owed.
    pub fn total_repayment(&self) -> f64 {
        self.principal + self.interest()
    }
}

/// The payload for creating a loan.
///
/// This is the shape submitted by both the add loan form and the JSON API,
/// so the field names match the wire format. Use [NewLoan::new] to validate
/// the payload before it touches the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanForm {
    /// The name of the person borrowing the money.
    pub nama_peminjam: String,
    /// The amount lent, before interest.
    pub jumlah_pinjaman: f64,
    /// The currency code, one of "IDR" or "THB".
    pub mata_uang: String,
    /// The interest rate as a percentage of the principal.
    pub tingkat_bunga: f64,
}

/// A loan payload that has passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    /// The name of the person borrowing the money.
    pub borrower: String,
    /// The amount lent, before interest.
    pub principal: f64,
    /// The currency the loan is denominated in.
    pub currency: Currency,
    /// The interest rate as a percentage of the principal.
    pub interest_rate: f64,
}

impl NewLoan {
    /// Validate a loan payload.
    ///
    /// The borrower name must be non-empty after trimming, the principal must
    /// be a positive finite number, the interest rate must be a non-negative
    /// finite number and the currency code must name a supported currency.
    ///
    /// # Errors
    /// Returns the first validation failure as an [Error].
    pub fn new(form: &LoanForm) -> Result<Self, Error> {
        let borrower = form.nama_peminjam.trim();

        if borrower.is_empty() {
            return Err(Error::EmptyBorrowerName);
        }

        if !form.jumlah_pinjaman.is_finite() || form.jumlah_pinjaman <= 0.0 {
            return Err(Error::InvalidPrincipal(form.jumlah_pinjaman));
        }

        if !form.tingkat_bunga.is_finite() || form.tingkat_bunga < 0.0 {
            return Err(Error::NegativeInterestRate(form.tingkat_bunga));
        }

        let currency = form.mata_uang.parse()?;

        Ok(Self {
            borrower: borrower.to_string(),
            principal: form.jumlah_pinjaman,
            currency,
            interest_rate: form.tingkat_bunga,
        })
    }
}

pub fn create_loan_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS pinjaman (
            id INTEGER PRIMARY KEY,
            nama_peminjam TEXT NOT NULL,
            jumlah_pinjaman REAL NOT NULL,
            mata_uang TEXT NOT NULL,
            tingkat_bunga REAL NOT NULL,
            tanggal_pinjaman TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_loan(row: &Row) -> Result<Loan, rusqlite::Error> {
    Ok(Loan {
        id: row.get(0)?,
        borrower: row.get(1)?,
        principal: row.get(2)?,
        currency: row.get(3)?,
        interest_rate: row.get(4)?,
        loan_date: row.get(5)?,
    })
}

/// Insert a validated loan into the database.
///
/// The store assigns the id and records the current UTC time as the loan
/// date.
///
/// # Errors
/// Returns an error if the insert fails.
pub fn create_loan(new_loan: NewLoan, connection: &Connection) -> Result<Loan, Error> {
    let loan_date = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO pinjaman (nama_peminjam, jumlah_pinjaman, mata_uang, tingkat_bunga, tanggal_pinjaman)
            VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_loan.borrower,
            new_loan.principal,
            new_loan.currency,
            new_loan.interest_rate,
            loan_date,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Loan {
        id,
        borrower: new_loan.borrower,
        principal: new_loan.principal,
        currency: new_loan.currency,
        interest_rate: new_loan.interest_rate,
        loan_date,
    })
}

/// Get all loans, most recently recorded first.
///
/// Loans recorded at the same instant are ordered by descending id so the
/// ordering stays deterministic.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn get_all_loans(connection: &Connection) -> Result<Vec<Loan>, Error> {
    connection
        .prepare(
            "SELECT id, nama_peminjam, jumlah_pinjaman, mata_uang, tingkat_bunga, tanggal_pinjaman
                FROM pinjaman
                ORDER BY tanggal_pinjaman DESC, id DESC",
        )?
        .query_map([], map_row_to_loan)?
        .map(|loan_result| loan_result.map_err(Error::from))
        .collect()
}

pub type RowsAffected = usize;

/// Delete the loan with `id`.
///
/// Deleting an id that is not in the database is a no-op: the call succeeds
/// and reports zero rows affected.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn delete_loan(id: LoanId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM pinjaman WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_loan_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_loan_table(&connection));
    }
}
