//! Validated field values for contacts and notes.
//!
//! Every field kind exposes a `parse` constructor that normalizes its input
//! (trimming surrounding whitespace) and rejects malformed values with
//! [`RolodexError::Validation`]. Once a value exists it is known to be valid,
//! so the domain layer never checks it again.
//!
//! Deserialization runs through the same constructors (`#[serde(try_from)]`),
//! which means a data file holding, say, a nine-digit phone is rejected as a
//! whole instead of smuggling an invalid value into memory.
//!
//! | Field     | Rule                                              |
//! |-----------|---------------------------------------------------|
//! | `Name`    | non-empty                                         |
//! | `Phone`   | exactly [`PHONE_LENGTH`] ASCII digits             |
//! | `Birthday`| [`DATE_FORMAT`] (`DD.MM.YYYY`)                    |
//! | `Email`   | `local@domain.tld`                                |
//! | `Address` | at most [`ADDRESS_MAX_LENGTH`] characters         |
//! | `Tag`     | non-empty, no whitespace                          |

use crate::error::{Result, RolodexError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// chrono pattern used to read and render birthdays.
pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const PHONE_LENGTH: usize = 10;
pub const ADDRESS_MAX_LENGTH: usize = 80;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
        .expect("email pattern is a valid regex")
});

/// Implements the string plumbing shared by all text-backed fields:
/// `as_str`, `Display`, and the serde `try_from`/`into` conversions.
macro_rules! text_field {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = RolodexError;

            fn try_from(value: String) -> Result<Self> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RolodexError::validation("Name cannot be empty"));
        }
        Ok(Self(value.to_string()))
    }
}

text_field!(Name);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.len() != PHONE_LENGTH || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(RolodexError::validation(format!(
                "Phone must be a number of length {}",
                PHONE_LENGTH
            )));
        }
        Ok(Self(value.to_string()))
    }
}

text_field!(Phone);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn parse(value: &str) -> Result<Self> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| RolodexError::validation("Invalid date format. Use DD.MM.YYYY"))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if !EMAIL_PATTERN.is_match(value) {
            return Err(RolodexError::validation("Invalid email address"));
        }
        Ok(Self(value.to_string()))
    }
}

text_field!(Email);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.chars().count() > ADDRESS_MAX_LENGTH {
            return Err(RolodexError::validation(format!(
                "Address should be {} characters or less",
                ADDRESS_MAX_LENGTH
            )));
        }
        Ok(Self(value.to_string()))
    }
}

text_field!(Address);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RolodexError::validation("Tag cannot be empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(RolodexError::validation(format!(
                "Tag '{}' cannot contain whitespace",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }
}

text_field!(Tag);
