//! Parsing error types for listing and announcement extraction
//!
//! Missing or malformed fields inside an announcement page are tolerated and
//! logged; these errors cover values that cannot be accepted at all.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

impl ParsingError {
    pub fn invalid_value(field: &str, value: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
