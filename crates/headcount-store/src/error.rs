//! Error types for the data store.
//!
//! Every failure the store reports carries a human-readable detail string.
//! Controllers surface that detail to users verbatim, so variants keep it
//! separate from the category prefix added by `Display`.

/// Errors that can occur when talking to the data store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The caller is not allowed to read or write the path.
    #[error("permission denied: {0}")]
    Denied(String),

    /// The store could not be reached (network loss, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be converted to the requested type.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store has shut down and will deliver nothing further.
    #[error("store closed")]
    Closed,
}

impl StoreError {
    /// The human-readable detail, without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Denied(detail) | Self::Unavailable(detail) | Self::Serialization(detail) => {
                detail
            }
            Self::Closed => "store closed",
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_strips_category() {
        let err = StoreError::Denied(String::from("denied"));
        assert_eq!(err.detail(), "denied");
        assert_eq!(err.to_string(), "permission denied: denied");
    }

    #[test]
    fn closed_has_fixed_detail() {
        assert_eq!(StoreError::Closed.detail(), "store closed");
    }
}
