//! Task identifier value object.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Opaque token issued by the server when a job starts.
///
/// It is the only correlation key for status and stop calls and never
/// changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskIdentifier(String);

impl TaskIdentifier {
    /// Longest identifier accepted, in bytes.
    pub const MAX_LEN: usize = 256;

    /// Parses operator or server input into an identifier.
    ///
    /// Surrounding whitespace is trimmed first.
    ///
    /// # Errors
    /// Returns `IdentifierError` if the trimmed value is empty, too long,
    /// or contains whitespace or control characters.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if id.len() > Self::MAX_LEN {
            return Err(IdentifierError::TooLong(id.len()));
        }
        if let Some(c) = id.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(IdentifierError::InvalidCharacter(c));
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskIdentifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaskIdentifier> for String {
    fn from(id: TaskIdentifier) -> Self {
        id.0
    }
}
