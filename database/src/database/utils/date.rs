use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

/// `dd/mm/yyyy`
pub const BIRTHDATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateError {
    #[error("The birth date cannot be null.")]
    MissingBirthdate,

    #[error("Invalid date format. Expected format: dd/MM/yyyy. Provided: {0}")]
    InvalidFormat(String),
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_birthdate(birthdate: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(birthdate, BIRTHDATE_FORMAT)
        .map_err(|_| DateError::InvalidFormat(birthdate.to_string()))
}

/// Whole years between the birthdate and `today`
///
/// A birthdate in the future gives a negative age, less than a full year ahead gives 0
pub fn calculate_age(birthdate: Option<&str>, today: NaiveDate) -> Result<i32, DateError> {
    let birthdate = parse_birthdate(birthdate.ok_or(DateError::MissingBirthdate)?)?;

    if birthdate <= today {
        Ok(full_years(birthdate, today))
    } else {
        Ok(-full_years(today, birthdate))
    }
}

fn full_years(earlier: NaiveDate, later: NaiveDate) -> i32 {
    let years = later.year() - earlier.year();

    // Anniversary not reached yet this year
    if (later.month(), later.day()) < (earlier.month(), earlier.day()) {
        return years - 1;
    }

    years
}
