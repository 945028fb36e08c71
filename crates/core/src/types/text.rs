//! Required free-text fields (customer name, phone, address).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RequiredText`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The input is empty or only whitespace.
    #[error("{field} is required")]
    Empty {
        /// Name of the field being validated.
        field: &'static str,
    },
    /// The input is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Name of the field being validated.
        field: &'static str,
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// A trimmed, non-empty string of bounded length.
///
/// ## Examples
///
/// ```
/// use crown_shop_core::RequiredText;
///
/// let name = RequiredText::parse("name", "  Li Wei ").unwrap();
/// assert_eq!(name.as_str(), "Li Wei");
///
/// assert!(RequiredText::parse("phone", "   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct RequiredText(String);

impl RequiredText {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 500;

    /// Parse a required field, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and
    /// [`TextError::TooLong`] above [`Self::MAX_LENGTH`] characters.
    pub fn parse(field: &'static str, s: &str) -> Result<Self, TextError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty { field });
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TextError::TooLong {
                field,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RequiredText {
    type Error = TextError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse("text", &s)
    }
}

impl From<RequiredText> for String {
    fn from(text: RequiredText) -> Self {
        text.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
