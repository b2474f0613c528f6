//! Lookup filters and the policy that builds them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IdentifierError;
use crate::types::{CANONICAL_ID_FIELD, CUSTOM_ID_FIELD, CanonicalId, Document};

use super::ResourceIdentifier;

/// A backend-neutral predicate selecting documents.
///
/// Backends translate filters into their own query language. The in-memory
/// evaluation in [`Filter::matches`] is the reference semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// The canonical identifier equals this value.
    CanonicalId(CanonicalId),
    /// A top-level field equals a JSON value.
    ///
    /// Strings never equal numbers; numbers compare numerically.
    FieldEquals {
        /// Top-level field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
    /// At least one branch matches. An empty list matches nothing.
    AnyOf(Vec<Filter>),
}

impl Filter {
    /// Creates a [`Filter::FieldEquals`].
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluates the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::CanonicalId(id) => document
                .get(CANONICAL_ID_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|stored| stored.eq_ignore_ascii_case(&id.to_hex())),
            Filter::FieldEquals { field, value } => document
                .get(field)
                .is_some_and(|stored| values_equal(stored, value)),
            Filter::AnyOf(branches) => branches.iter().any(|branch| branch.matches(document)),
        }
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => left == right,
    }
}

/// The operation a filter is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPurpose {
    /// `get_by_identifier`.
    Read,
    /// `update_by_identifier` and `delete_by_identifier`.
    Write,
}

/// Tunables for filter construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPolicy {
    /// For writes addressed by a custom identifier, also match documents
    /// whose canonical-id field holds the identifier as a plain string.
    ///
    /// Only legacy records written with a string in the canonical slot need
    /// this. Disabled by default.
    #[serde(default)]
    pub legacy_canonical_fallback: bool,
}

impl FilterPolicy {
    /// Enables or disables the legacy canonical-id string branch.
    pub fn with_legacy_canonical_fallback(mut self, enabled: bool) -> Self {
        self.legacy_canonical_fallback = enabled;
        self
    }
}

/// Builds the lookup filter for a classified identifier.
///
/// - Canonical identifiers select by canonical id only. A shape match that
///   fails to parse is an error, never a fallback to the custom branches.
/// - Custom identifiers select through [`custom_id_filter`].
pub fn build_filter(
    identifier: &ResourceIdentifier,
    purpose: FilterPurpose,
    policy: &FilterPolicy,
) -> Result<Filter, IdentifierError> {
    match identifier {
        ResourceIdentifier::Canonical(raw) => Ok(Filter::CanonicalId(CanonicalId::parse(raw)?)),
        ResourceIdentifier::Custom(raw) => Ok(custom_id_filter(raw, purpose, policy)),
    }
}

/// Builds the union filter for a custom identifier.
///
/// Custom ids may have been persisted as strings or as integers, so the
/// filter matches the custom-id field against:
///
/// 1. the identifier as a string;
/// 2. the identifier's leading integer as an `i64`, when it has one (see
///    [`leading_integer`]);
/// 3. for writes with [`FilterPolicy::legacy_canonical_fallback`] set, the
///    canonical-id field against the identifier as a string.
pub fn custom_id_filter(raw: &str, purpose: FilterPurpose, policy: &FilterPolicy) -> Filter {
    let mut branches = vec![Filter::field_equals(CUSTOM_ID_FIELD, raw)];

    if let Some(numeric) = leading_integer(raw) {
        branches.push(Filter::field_equals(CUSTOM_ID_FIELD, numeric));
    }

    if purpose == FilterPurpose::Write && policy.legacy_canonical_fallback {
        branches.push(Filter::field_equals(CANONICAL_ID_FIELD, raw));
    }

    Filter::AnyOf(branches)
}

/// Reads the integer at the start of `raw`, the way clients that wrote
/// numeric custom ids parse them.
///
/// Leading whitespace and one sign are skipped, a `0x`/`0X` prefix switches
/// to hexadecimal, and parsing stops at the first character that is not a
/// digit: `"42abc"` and `" 42"` give 42, `"4.5"` gives 4. Returns `None` when
/// no digit follows or the value does not fit in an `i64`.
pub fn leading_integer(raw: &str) -> Option<i64> {
    let rest = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].chars().try_fold(0i128, |acc, c| {
        let digit = i128::from(c.to_digit(radix)?);
        acc.checked_mul(i128::from(radix))?.checked_add(digit)
    })?;

    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}
