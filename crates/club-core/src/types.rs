//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The provided value contained whitespace, which the log format uses as
    /// a field separator.
    #[error("{field} cannot contain whitespace: {value:?}")]
    Whitespace { field: &'static str, value: String },

    /// Table numbers start at 1.
    #[error("table number must be at least 1")]
    ZeroTable,
}

/// A client's name.
///
/// Names are case-sensitive and unique among the clients currently in the
/// club. Ordering is plain byte-wise string ordering, which is what the
/// closing report sorts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    const FIELD: &'static str = "client name";

    /// Creates a name; it must be non-empty and free of whitespace, since
    /// the log separates fields with whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ValidationError::Whitespace {
                field: Self::FIELD,
                value: name,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientName> for String {
    fn from(name: ClientName) -> Self {
        name.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 1-based table number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TableId(u32);

impl TableId {
    /// Creates a table number; zero is rejected.
    pub const fn new(id: u32) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::ZeroTable);
        }
        Ok(Self(id))
    }

    /// The table number as written in the log.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based slot index for this table.
    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Table number for a zero-based slot index.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index + 1).unwrap_or(u32::MAX))
    }
}

impl TryFrom<u32> for TableId {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableId> for u32 {
    fn from(id: TableId) -> Self {
        id.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
