//! URL-safe slug derivation for groups and collaborations.

use super::GroupDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex digits appended when deduplicating a colliding slug.
const DEDUP_SUFFIX_LEN: usize = 8;

/// Validated URL-safe slug derived from a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derives a slug from a display name.
    ///
    /// Lowercases, maps runs of non-alphanumeric characters to single
    /// hyphens, and trims leading/trailing hyphens.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::UnsluggableName`] when no alphanumeric
    /// characters survive normalisation.
    pub fn derive(name: &str) -> Result<Self, GroupDomainError> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_hyphen = false;
        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.extend(ch.to_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        if slug.is_empty() {
            return Err(GroupDomainError::UnsluggableName(name.to_owned()));
        }
        Ok(Self(slug))
    }

    /// Reconstructs a slug from persisted storage without re-deriving it.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::UnsluggableName`] when the stored value
    /// is empty.
    pub fn from_persisted(value: impl Into<String>) -> Result<Self, GroupDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(GroupDomainError::UnsluggableName(raw));
        }
        Ok(Self(raw))
    }

    /// Returns a deduplicated variant for use after a uniqueness collision.
    ///
    /// Appends a short hex digest of the slug and a discriminator so
    /// repeated collisions produce distinct, stable candidates.
    #[must_use]
    pub fn deduplicated(&self, discriminator: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hasher.update(discriminator.to_be_bytes());
        let digest = hasher.finalize();
        let suffix: String = digest
            .iter()
            .flat_map(|byte| {
                let hi = char::from_digit(u32::from(byte >> 4), 16);
                let lo = char::from_digit(u32::from(byte & 0x0f), 16);
                [hi, lo]
            })
            .flatten()
            .take(DEDUP_SUFFIX_LEN)
            .collect();
        Self(format!("{}-{suffix}", self.0))
    }

    /// Returns the slug as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
