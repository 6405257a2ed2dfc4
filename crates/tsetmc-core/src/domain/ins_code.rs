use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Exchange-wide numeric instrument code (the 17-ish digit `i` query parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InsCode(String);

impl InsCode {
    /// Parse a code, trimming surrounding whitespace. Only ASCII digits are accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyInsCode);
        }

        if let Some((index, ch)) = trimmed.char_indices().find(|(_, ch)| !ch.is_ascii_digit()) {
            return Err(ValidationError::InsCodeInvalidChar { ch, index });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InsCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for InsCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for InsCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<u64> for InsCode {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<InsCode> for String {
    fn from(value: InsCode) -> Self {
        value.0
    }
}
