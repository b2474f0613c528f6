//! Resource kinds served by the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the parallel CRUD domains sharing the resource store contract.
///
/// Every kind is persisted in its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Portfolio cards.
    Cards,
    /// Card categories.
    Categories,
    /// Application users.
    Users,
    /// Portfolio image records.
    Portfolio,
}

impl ResourceKind {
    /// All resource kinds, in bootstrap order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Users,
        ResourceKind::Cards,
        ResourceKind::Categories,
        ResourceKind::Portfolio,
    ];

    /// Name of the backing collection.
    pub fn collection_name(&self) -> &'static str {
        match self {
            ResourceKind::Cards => "cards",
            ResourceKind::Categories => "categories",
            ResourceKind::Users => "users",
            ResourceKind::Portfolio => "portfolio",
        }
    }

    /// Singular, human-facing label used in response messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Cards => "Card",
            ResourceKind::Categories => "Category",
            ResourceKind::Users => "User",
            ResourceKind::Portfolio => "Portfolio item",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Returned when a string names no known resource kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource kind: {0}")]
pub struct ParseResourceKindError(pub String);

impl FromStr for ResourceKind {
    type Err = ParseResourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cards" => Ok(ResourceKind::Cards),
            "categories" => Ok(ResourceKind::Categories),
            "users" => Ok(ResourceKind::Users),
            "portfolio" => Ok(ResourceKind::Portfolio),
            other => Err(ParseResourceKindError(other.to_string())),
        }
    }
}
