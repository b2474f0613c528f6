//! Identifier classification by shape.

use std::fmt;

use crate::types::CanonicalId;

/// A caller-supplied identifier, tagged by how it will be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceIdentifier {
    /// Has the canonical shape: resolved against the canonical id only.
    Canonical(String),
    /// Anything else: resolved against the custom id.
    Custom(String),
}

impl ResourceIdentifier {
    /// Classifies a raw identifier.
    ///
    /// Exactly [`CanonicalId::HEX_LEN`] ASCII hex digits (either case) is
    /// canonical. Every other string, including the empty string, is custom.
    /// Classification never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_persistence::identifier::ResourceIdentifier;
    ///
    /// assert!(ResourceIdentifier::classify("507f1f77bcf86cd799439011").is_canonical());
    /// assert!(!ResourceIdentifier::classify("ace-of-spades").is_canonical());
    /// assert!(!ResourceIdentifier::classify("42").is_canonical());
    /// ```
    pub fn classify(raw: &str) -> Self {
        if is_canonical_shape(raw) {
            ResourceIdentifier::Canonical(raw.to_string())
        } else {
            ResourceIdentifier::Custom(raw.to_string())
        }
    }

    /// Returns the identifier as supplied.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceIdentifier::Canonical(value) | ResourceIdentifier::Custom(value) => value,
        }
    }

    /// Returns `true` for canonical candidates.
    pub fn is_canonical(&self) -> bool {
        matches!(self, ResourceIdentifier::Canonical(_))
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceIdentifier::Canonical(value) => write!(f, "canonical:{}", value),
            ResourceIdentifier::Custom(value) => write!(f, "custom:{}", value),
        }
    }
}

/// Returns `true` if `raw` is exactly 24 hexadecimal characters.
pub fn is_canonical_shape(raw: &str) -> bool {
    raw.len() == CanonicalId::HEX_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}
