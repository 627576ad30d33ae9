use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "NumberOrString", into = "u32")]
pub struct StationNumber(pub u32);

impl StationNumber {
    pub fn to_number(self) -> u32 {
        self.0
    }

    /// Any value that fits, including 0. Stored rows are checked by `FireStation::validate`
    fn from_raw(value: i64) -> Result<Self, StationNumberError> {
        if value < 0 {
            return Err(StationNumberError::NegativeOrZero(value));
        }

        let number = u32::try_from(value).map_err(|_| StationNumberError::TooLarge(value))?;

        Ok(StationNumber(number))
    }

    fn parse_raw(s: &str) -> Result<Self, StationNumberError> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| StationNumberError::NotANumber(s.to_string()))?;

        StationNumber::from_raw(value)
    }
}

impl fmt::Display for StationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StationNumber> for u32 {
    fn from(value: StationNumber) -> Self {
        value.0
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StationNumberError {
    #[error("Station number must be greater than 0, got {0}")]
    NegativeOrZero(i64),

    #[error("Station number is too large, got {0}")]
    TooLarge(i64),

    #[error("Station number is not a number: {0}")]
    NotANumber(String),
}

impl TryFrom<i64> for StationNumber {
    type Error = StationNumberError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(StationNumberError::NegativeOrZero(value));
        }

        StationNumber::from_raw(value)
    }
}

/// Request parameters, 0 is never a station
impl FromStr for StationNumber {
    type Err = StationNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let station = StationNumber::parse_raw(s)?;

        if station.0 == 0 {
            return Err(StationNumberError::NegativeOrZero(0));
        }

        Ok(station)
    }
}

impl TryFrom<NumberOrString> for StationNumber {
    type Error = StationNumberError;

    fn try_from(value: NumberOrString) -> Result<Self, Self::Error> {
        match value {
            NumberOrString::Number(n) => StationNumber::from_raw(n),
            NumberOrString::Text(s) => StationNumber::parse_raw(&s),
        }
    }
}

/// The data file stores numeric fields (station, zip) as strings, clients tend to send numbers
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    Text(String),
}

/// Used with `#[serde(deserialize_with = ...)]` for fields that are kept as text
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::Text(s) => s,
    })
}

/// Natural key of a medical record, also the soft join key against a person
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FullName {
    pub first_name: String,
    pub last_name: String,
}

impl FullName {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        FullName {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Natural key of a fire station mapping
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FireStationKey {
    pub address: String,
    pub station: StationNumber,
}

impl FireStationKey {
    pub fn new(address: &str, station: StationNumber) -> Self {
        FireStationKey {
            address: address.to_string(),
            station,
        }
    }
}

impl fmt::Display for FireStationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.station)
    }
}

// Values
pub const DEFAULT_DATA_FILE: &str = "data/data.json";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Anyone at or below this age is a child
pub const CHILD_MAX_AGE: i32 = 18;
