//! Backend identification.

/// Identifies the type of database backend.
///
/// Reported by [`DocumentStore::kind`](super::DocumentStore::kind) and echoed
/// by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Process-local maps (tests and throwaway servers).
    Memory,
    /// SQLite database (file-based or in-memory).
    Sqlite,
    /// MongoDB (document store).
    MongoDB,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::MongoDB => write!(f, "mongodb"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Memory.to_string(), "memory");
        assert_eq!(BackendKind::Sqlite.to_string(), "sqlite");
        assert_eq!(BackendKind::MongoDB.to_string(), "mongodb");
    }
}
