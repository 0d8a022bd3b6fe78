//! Email value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an email address fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email is empty")]
    Empty,

    #[error("email is longer than {max} characters")]
    TooLong { max: usize },

    #[error("email contains whitespace")]
    Whitespace,

    #[error("email is missing an @ symbol")]
    MissingAtSymbol,

    #[error("email has an empty local part")]
    EmptyLocalPart,

    #[error("email has an invalid domain")]
    InvalidDomain,
}

/// A validated email address.
///
/// Accepts the `local@domain.tld` shape: non-empty local part, a
/// domain containing a dot with non-empty labels around it, no
/// whitespace anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let at_pos = s.find('@').ok_or(EmailError::MissingAtSymbol)?;

        if at_pos == 0 {
            return Err(EmailError::EmptyLocalPart);
        }

        let domain = &s[at_pos + 1..];
        if domain.contains('@') {
            return Err(EmailError::InvalidDomain);
        }

        // Domain needs a dot with non-empty labels on both sides.
        match domain.rfind('.') {
            Some(dot) if dot > 0 && dot + 1 < domain.len() => {}
            _ => return Err(EmailError::InvalidDomain),
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(Email::parse("ada@example.com").is_ok());
        assert!(Email::parse("first.last@sub.example.co").is_ok());
        assert!(Email::parse("a+tag@example.com").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn rejects_missing_at() {
        assert_eq!(
            Email::parse("ada.example.com"),
            Err(EmailError::MissingAtSymbol)
        );
    }

    #[test]
    fn rejects_empty_local_part() {
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyLocalPart));
    }

    #[test]
    fn rejects_bad_domains() {
        assert_eq!(Email::parse("ada@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("ada@example"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("ada@.com"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("ada@example."), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("a@b@example.com"), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn rejects_whitespace() {
        assert_eq!(
            Email::parse("ada lovelace@example.com"),
            Err(EmailError::Whitespace)
        );
    }

    #[test]
    fn rejects_overlong() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn display_returns_the_address() {
        let email = Email::parse("ada@example.com").unwrap();
        assert_eq!(email.to_string(), "ada@example.com");
        assert_eq!(email.as_str(), "ada@example.com");
    }
}
