//! Validated text primitives shared by the admissions crates.
//!
//! Registration data is stringly by nature (every form control yields text), so the
//! guarantees live in small wrapper types instead of on the draft itself:
//! - [`NonEmptyText`]: at least one non-whitespace character, stored trimmed.
//! - [`EmailAddress`]: a `local@domain.tld` shaped address.
//!
//! "Whitespace" here is Unicode whitespace plus U+FEFF (byte-order mark).

use regex::Regex;
use std::sync::LazyLock;

/// Removes leading and trailing whitespace, including U+FEFF.
pub fn trim_whitespace(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating an [`EmailAddress`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("email address cannot be empty")]
    Empty,
    #[error("email address is not of the form local@domain.tld: {0}")]
    Malformed(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = trim_whitespace(input.as_ref());
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Non-whitespace/non-@ local part, "@", non-whitespace/non-@ domain, ".", non-whitespace tail.
// The domain part is greedy, so the final dot is the one that splits off the tail.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$").expect("email shape regex")
});

/// An email address with a `local@domain.tld` shape.
///
/// This is a shape check only: it does not resolve the domain or follow RFC 5322. The address
/// is stored exactly as given, without trimming, because surrounding whitespace makes an
/// address malformed rather than being silently removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses an email address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] for an empty input and [`EmailError::Malformed`] when
    /// the input does not have the `local@domain.tld` shape.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, EmailError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(EmailError::Empty);
        }
        if !EMAIL_SHAPE.is_match(input) {
            return Err(EmailError::Malformed(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  2025-2026 \n").expect("non-empty");
        assert_eq!(text.as_str(), "2025-2026");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        assert_eq!(NonEmptyText::new("   \t"), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert_eq!(trim_whitespace("\u{FEFF} Amina \u{FEFF}"), "Amina");
        assert_eq!(NonEmptyText::new("\u{FEFF}"), Err(TextError::Empty));
    }

    #[test]
    fn email_accepts_simple_addresses() {
        for ok in [
            "parent@example.com",
            "a@b.c",
            "first.last+school@mail.example.org",
            "user@sub.domain.co.uk",
        ] {
            let email = EmailAddress::parse(ok).expect("should be accepted");
            assert_eq!(email.as_str(), ok);
        }
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in [
            "abc",
            "not-an-email",
            "no-at.example.com",
            "two@@example.com",
            "a@b@c.com",
            "missing@tld",
            "space in@example.com",
            " parent@example.com",
            "parent@example.com ",
            "@example.com",
            "parent@.",
            "a\u{FEFF}b@c.d",
            "parent@example.com\u{FEFF}",
        ] {
            assert!(
                matches!(EmailAddress::parse(bad), Err(EmailError::Malformed(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn email_rejects_empty() {
        assert_eq!(EmailAddress::parse(""), Err(EmailError::Empty));
    }
}
