//! Input validation for dates and amounts
//!
//! Dates arrive as the command-line argument and must be real, non-future
//! calendar days in `YYYY-MM-DD` form. Amounts arrive from the interactive
//! prompt and must be plain decimals with at most two fractional digits.

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a date string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDate {
    /// Not shaped like `YYYY-MM-DD`
    #[error("'{0}' is not in YYYY-MM-DD format")]
    Format(String),

    /// Month outside 01-12
    #[error("Invalid month: {0:02}")]
    Month(u32),

    /// Day outside what the month allows
    #[error("Invalid day {day:02} for month {month:02}!")]
    DayForMonth { day: u32, month: u32 },

    /// February 29th in a common year
    #[error("Invalid day for February ({0} is not a leap year)!")]
    NotLeapYear(i32),

    /// Strictly after today
    #[error("Date can't be in the future: {0}")]
    Future(NaiveDate),
}

/// Validates a date against the current local date.
pub fn validate_date(text: &str) -> Result<NaiveDate, InvalidDate> {
    validate_date_on(text, Local::now().date_naive())
}

/// Validates a date string, treating `today` as the latest acceptable day.
pub fn validate_date_on(text: &str, today: NaiveDate) -> Result<NaiveDate, InvalidDate> {
    let (year, month, day) = split_date(text).ok_or_else(|| InvalidDate::Format(text.to_string()))?;

    if !(1..=12).contains(&month) {
        return Err(InvalidDate::Month(month));
    }
    if !(1..=31).contains(&day) {
        return Err(InvalidDate::DayForMonth { day, month });
    }

    match month {
        4 | 6 | 9 | 11 if day > 30 => return Err(InvalidDate::DayForMonth { day, month }),
        2 if day > 29 => return Err(InvalidDate::DayForMonth { day, month }),
        2 if day == 29 && !is_leap_year(year) => return Err(InvalidDate::NotLeapYear(year)),
        _ => {}
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| InvalidDate::Format(text.to_string()))?;

    if date > today {
        return Err(InvalidDate::Future(date));
    }

    Ok(date)
}

/// Gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Splits `YYYY-MM-DD` into numeric parts, requiring exact digit widths.
fn split_date(text: &str) -> Option<(i32, u32, u32)> {
    let mut parts = text.split('-');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if !is_digits(year, 4) || !is_digits(month, 2) || !is_digits(day, 2) {
        return None;
    }

    Some((year.parse().ok()?, month.parse().ok()?, day.parse().ok()?))
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && all_digits(s)
}

/// True for a non-empty run of ASCII digits
fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Checks an amount typed by the user.
///
/// Accepts a digit string with an optional fractional part of one or two
/// digits. Signs, exponents, a bare trailing point and repeated points are
/// all rejected.
pub fn validate_amount(text: &str) -> bool {
    let mut parts = text.split('.');
    let whole = parts.next().unwrap_or_default();

    match (parts.next(), parts.next()) {
        (None, _) => all_digits(whole),
        (Some(fraction), None) => {
            all_digits(whole) && all_digits(fraction) && (1..=2).contains(&fraction.len())
        }
        (Some(_), Some(_)) => false,
    }
}

/// Parses a valid amount into its canonical decimal form.
///
/// Trailing fractional zeros are dropped so that `"10"`, `"10.0"` and
/// `"10.00"` produce the same value. Amounts that `Decimal` cannot hold
/// exactly yield `None` rather than a rounded value.
pub fn canonical_amount(text: &str) -> Option<Decimal> {
    if !validate_amount(text) {
        return None;
    }

    let typed_scale = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    let amount = Decimal::from_str(text).ok()?;
    if amount.scale() as usize != typed_scale {
        return None;
    }
    Some(amount.normalize())
}
