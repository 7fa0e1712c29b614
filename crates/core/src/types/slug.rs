//! URL slug type for products, categories, and collections.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A URL-safe identifier for catalog entities.
///
/// Slugs are unique per entity type and appear in public URLs, so they are
/// restricted to lowercase ASCII letters, digits, and interior hyphens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 120;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains characters
    /// outside `[a-z0-9-]`, or starts/ends with a hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacter);
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(Self(s.to_string()))
    }

    /// Derive a slug from free text (e.g. a product title).
    ///
    /// Lowercases, maps runs of non-alphanumeric characters to single
    /// hyphens, and trims edge hyphens. Returns `None` if nothing usable
    /// remains.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        let mut out = String::with_capacity(title.len());
        let mut last_hyphen = true; // suppress leading hyphen
        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
                last_hyphen = false;
            } else if !last_hyphen {
                out.push('-');
                last_hyphen = true;
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        out.truncate(Self::MAX_LENGTH);
        while out.ends_with('-') {
            out.pop();
        }
        if out.is_empty() { None } else { Some(Self(out)) }
    }

    /// Get the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        assert!(Slug::parse("wireless-mouse").is_ok());
        assert!(Slug::parse("usb-c-hub-2024").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn test_rejects_uppercase_and_spaces() {
        assert!(matches!(
            Slug::parse("Wireless Mouse"),
            Err(SlugError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_rejects_edge_hyphens() {
        assert!(matches!(Slug::parse("-abc"), Err(SlugError::EdgeHyphen)));
        assert!(matches!(Slug::parse("abc-"), Err(SlugError::EdgeHyphen)));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Slug::parse(""), Err(SlugError::Empty)));
    }

    #[test]
    fn test_from_title() {
        let slug = Slug::from_title("Wireless Mouse (Black) -- 2nd Gen").expect("slug");
        assert_eq!(slug.as_str(), "wireless-mouse-black-2nd-gen");
    }

    #[test]
    fn test_from_title_empty() {
        assert!(Slug::from_title("!!!").is_none());
    }
}
