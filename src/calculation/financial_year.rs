//! Indian financial-year helpers.
//!
//! The financial year runs from 1 April to 31 March and is written
//! `"YYYY-YY"` (e.g. `"2024-25"`). Months are numbered relative to the
//! financial year: April = 1 through March = 12. Nothing here reads the
//! system clock; callers pass the as-of date.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// Returns the financial year containing `date`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::get_financial_year;
/// use chrono::NaiveDate;
///
/// assert_eq!(get_financial_year(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()), "2024-25");
/// assert_eq!(get_financial_year(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()), "2024-25");
/// ```
pub fn get_financial_year(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 4 {
        format!("{}-{:02}", year, (year + 1) % 100)
    } else {
        format!("{}-{:02}", year - 1, year % 100)
    }
}

/// Returns the financial-year month of `date`: April = 1 … March = 12.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::get_financial_year_month;
/// use chrono::NaiveDate;
///
/// assert_eq!(get_financial_year_month(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()), 1);
/// assert_eq!(get_financial_year_month(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()), 12);
/// ```
pub fn get_financial_year_month(date: NaiveDate) -> u32 {
    let month = date.month();
    if month >= 4 { month - 3 } else { month + 9 }
}

/// Returns the first and last day of a `"YYYY-YY"` financial year.
///
/// Returns `InvalidInput` if the string is not a well-formed financial year
/// (the suffix must be the two-digit year following the start year).
pub fn financial_year_bounds(financial_year: &str) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidInput {
        field: "financial_year".to_string(),
        message: format!("'{}' is not a YYYY-YY financial year", financial_year),
    };

    let (start, end) = financial_year.split_once('-').ok_or_else(invalid)?;
    if start.len() != 4 || end.len() != 2 {
        return Err(invalid());
    }
    let start_year: i32 = start.parse().map_err(|_| invalid())?;
    let end_suffix: i32 = end.parse().map_err(|_| invalid())?;
    if (start_year + 1) % 100 != end_suffix {
        return Err(invalid());
    }

    let first = NaiveDate::from_ymd_opt(start_year, 4, 1).ok_or_else(invalid)?;
    let last = NaiveDate::from_ymd_opt(start_year + 1, 3, 31).ok_or_else(invalid)?;
    Ok((first, last))
}

/// Parses an ISO `YYYY-MM-DD` date, naming the field on failure.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::parse_date;
///
/// assert!(parse_date("date_of_joining", "2018-01-01").is_ok());
/// assert!(parse_date("date_of_joining", "01/01/2018").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
