use std::fmt::{Debug, Display};

use super::table::ApplyErrors;

/// A record stored in a [`super::table::Table`], identified by its natural key
pub trait Row: Clone + Debug {
    type Key: PartialEq + Clone + Debug + Display;

    /// Used in log lines and error messages
    const ENTITY: &'static str;

    fn key(&self) -> Self::Key;

    /// Constraints checked before the row is written by a statement. Rows loaded from
    /// the data file are taken as they are
    fn validate(&self) -> Result<(), ApplyErrors> {
        Ok(())
    }
}

/// Rejects empty or whitespace only values for a required field
pub fn require_not_blank(field: &str, value: &str) -> Result<(), ApplyErrors> {
    if value.trim().is_empty() {
        return Err(ApplyErrors::NotNullConstraintViolation(field.to_string()));
    }

    Ok(())
}
