//! The currencies that loans can be denominated in, and how amounts of each
//! are rendered for display.

use std::{fmt::Display, str::FromStr, sync::OnceLock};

use numfmt::{Formatter, Precision};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A currency that a loan can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Indonesian rupiah. Amounts are displayed without fractional digits.
    #[serde(rename = "IDR")]
    Idr,
    /// Thai baht. Amounts are displayed with two fractional digits.
    #[serde(rename = "THB")]
    Thb,
}

impl Currency {
    /// The ISO 4217 code for the currency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Thb => "THB",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDR" => Ok(Currency::Idr),
            "THB" => Ok(Currency::Thb),
            other => Err(Error::UnsupportedCurrency(other.to_string())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(error.to_string().into()))
    }
}

/// Format `amount` as a currency string for display.
///
/// Rupiah amounts use a '.' thousands separator and no fractional digits,
/// e.g. "Rp1.000.000". Baht amounts use a ',' thousands separator and two
/// fractional digits, e.g. "฿2,000.00".
pub fn format_currency(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Idr => format_rupiah(amount),
        Currency::Thb => format_baht(amount),
    }
}

/// Format `amount` using the currency named by `currency_code`.
///
/// An unrecognised currency code falls back to the raw numeric value so
/// that rows with unexpected data in the currency column still render.
pub fn format_amount(amount: f64, currency_code: &str) -> String {
    match currency_code.parse::<Currency>() {
        Ok(currency) => format_currency(amount, currency),
        Err(_) => amount.to_string(),
    }
}

fn format_rupiah(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("Rp")
            .unwrap()
            .separator('.')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-Rp")
            .unwrap()
            .separator('.')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    let amount = amount.round();

    if amount < 0.0 {
        negative_fmt.fmt_string(amount.abs())
    } else if amount > 0.0 {
        positive_fmt.fmt_string(amount)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "Rp0".to_owned()
    }
}

fn format_baht(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("฿")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-฿")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if amount < 0.0 {
        negative_fmt.fmt_string(amount.abs())
    } else if amount > 0.0 {
        positive_fmt.fmt_string(amount)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "฿0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod currency_tests {
    use crate::Error;

    use super::Currency;

    #[test]
    fn parses_supported_codes() {
        assert_eq!("IDR".parse(), Ok(Currency::Idr));
        assert_eq!("THB".parse(), Ok(Currency::Thb));
    }

    #[test]
    fn rejects_unknown_code() {
        let got = "USD".parse::<Currency>();

        assert_eq!(got, Err(Error::UnsupportedCurrency("USD".to_string())));
    }

    #[test]
    fn round_trips_through_sql_text() {
        let connection = rusqlite::Connection::open_in_memory().unwrap();

        let got: Currency = connection
            .query_row("SELECT ?1", [Currency::Thb], |row| row.get(0))
            .unwrap();

        assert_eq!(got, Currency::Thb);
    }
}
