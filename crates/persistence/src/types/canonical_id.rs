//! Store-assigned canonical identifiers.
//!
//! A [`CanonicalId`] is 12 bytes rendered as 24 lowercase hex characters,
//! laid out the same way as a MongoDB ObjectId:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0..4  | seconds since the Unix epoch, big-endian |
//! | 4..9  | random value fixed for the process |
//! | 9..12 | wrapping counter, seeded randomly |

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::IdentifierError;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| {
    let random = uuid::Uuid::new_v4();
    let mut bytes = [0u8; 5];
    bytes.copy_from_slice(&random.as_bytes()[..5]);
    bytes
});

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| {
    let random = uuid::Uuid::new_v4();
    let [a, b, c, ..] = *random.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, a, b, c]))
});

/// The store-assigned, immutable identifier of a document.
///
/// # Examples
///
/// ```
/// use folio_persistence::types::CanonicalId;
///
/// let id = CanonicalId::parse("507f1f77bcf86cd799439011").unwrap();
/// assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
///
/// // Upper-case hex is accepted and normalized.
/// let upper = CanonicalId::parse("507F1F77BCF86CD799439011").unwrap();
/// assert_eq!(upper, id);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalId([u8; 12]);

impl CanonicalId {
    /// Length of the hex rendering.
    pub const HEX_LEN: usize = 24;

    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Wraps raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parses a 24-character hex string.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let malformed = |message: &str| IdentifierError::MalformedCanonicalId {
            value: value.to_string(),
            message: message.to_string(),
        };

        if value.len() != Self::HEX_LEN || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed("expected 24 hexadecimal characters"));
        }

        let mut bytes = [0u8; 12];
        for (byte, pair) in bytes.iter_mut().zip(value.as_bytes().chunks_exact(2)) {
            *byte = (nibble(pair[0]) << 4) | nibble(pair[1]);
        }
        Ok(Self(bytes))
    }

    /// Renders the identifier as 24 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Returns the creation time encoded in the first four bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default()
    }
}

// Callers check `is_ascii_hexdigit` first.
fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CanonicalId").field(&self.to_hex()).finish()
    }
}

impl FromStr for CanonicalId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CanonicalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CanonicalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique_and_well_formed() {
        let a = CanonicalId::generate();
        let b = CanonicalId::generate();
        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), CanonicalId::HEX_LEN);
        assert!(a.to_hex().bytes().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_embeds_timestamp() {
        let before = Utc::now().timestamp();
        let id = CanonicalId::generate();
        let after = Utc::now().timestamp();
        let ts = id.timestamp().timestamp();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn test_parse_round_trips_hex() {
        let id = CanonicalId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(CanonicalId::parse("abc").is_err());
        assert!(CanonicalId::parse("65a1b2c3d4e5f60718293a4b00").is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let err = CanonicalId::parse("zza1b2c3d4e5f60718293a4b").unwrap_err();
        assert!(matches!(err, IdentifierError::MalformedCanonicalId { .. }));
    }

    #[test]
    fn test_parse_rejects_signed_pairs() {
        let signed = "+0+0+0+0+0+0+0+0+0+0+0+0";
        assert!(CanonicalId::parse(signed).is_err());
        assert!(signed.parse::<CanonicalId>().is_err());
        assert!(serde_json::from_value::<CanonicalId>(serde_json::json!(signed)).is_err());
    }

    #[test]
    fn test_parse_accepts_mixed_case() {
        let id = CanonicalId::parse("AbCdEf0123456789aBcDeF01").unwrap();
        assert_eq!(id.to_hex(), "abcdef0123456789abcdef01");
    }

    #[test]
    fn test_parse_rejects_multibyte_input() {
        // 24 bytes but not 24 ASCII characters.
        assert!(CanonicalId::parse("éééééééééééé").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = CanonicalId::parse("507f1f77bcf86cd799439011").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("507f1f77bcf86cd799439011"));

        let back: CanonicalId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_value::<CanonicalId>(serde_json::json!("nope")).is_err());
    }
}
