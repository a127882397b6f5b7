//! Validation of raw user input before it reaches the store.

use std::fmt;

use chrono::NaiveDate;

use crate::types::DATE_FORMAT;

/// Rejected raw input. Field names are human-readable.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Not a number.
    InvalidNumber { field: &'static str, value: String },
    /// A number that must be positive was not.
    NotPositive { field: &'static str, value: String },
    /// Not a `YYYY-MM-DD` date.
    InvalidDate { value: String },
    /// Required text was blank.
    Empty { field: &'static str },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { field, value } => write!(f, "{field}: '{value}' is not a valid number"),
            Self::NotPositive { field, value } => write!(f, "{field}: '{value}' must be positive"),
            Self::InvalidDate { value } => {
                write!(f, "'{value}' is not a date in YYYY-MM-DD format (for example 2025-03-15)")
            }
            Self::Empty { field } => write!(f, "{field} is required"),
        }
    }
}

impl std::error::Error for InputError {}

/// Parses a height in centimeters.
pub fn parse_height(raw: &str) -> Result<f64, InputError> {
    let value = raw.trim();
    let height: f64 = value.parse().map_err(|_| InputError::InvalidNumber {
        field: "height",
        value: value.to_string(),
    })?;
    if !height.is_finite() {
        return Err(InputError::InvalidNumber {
            field: "height",
            value: value.to_string(),
        });
    }
    if height <= 0.0 {
        return Err(InputError::NotPositive {
            field: "height",
            value: value.to_string(),
        });
    }
    Ok(height)
}

/// Parses a watering interval in days.
pub fn parse_interval(raw: &str) -> Result<u32, InputError> {
    let value = raw.trim();
    let days: i64 = value.parse().map_err(|_| InputError::InvalidNumber {
        field: "watering interval",
        value: value.to_string(),
    })?;
    if days <= 0 {
        return Err(InputError::NotPositive {
            field: "watering interval",
            value: value.to_string(),
        });
    }
    u32::try_from(days).map_err(|_| InputError::InvalidNumber {
        field: "watering interval",
        value: value.to_string(),
    })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| InputError::InvalidDate {
        value: value.to_string(),
    })
}

/// Trims `raw` and rejects it when blank.
pub fn require_text<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, InputError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(InputError::Empty { field });
    }
    Ok(value)
}
