//! Error types for ocforge-core.
//!
//! Only a handful of operations in the core can fail hard:
//! - decoding property-list bytes (`Format`)
//! - building a schema from a malformed schema document (`Schema`)
//! - rejecting an invalid configuration (`InvalidArgument`)
//!
//! Everything else (path assignment, validation, reconciliation) reports
//! problems as data alongside a usable result.

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type OcResult<T> = Result<T, OcError>;

#[derive(Debug, Error)]
pub enum OcError {
    /// Malformed property-list bytes.
    #[error("format error: {0}")]
    Format(String),

    /// A schema document that cannot be interpreted.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl OcError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for decode failures.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed() {
        let e = OcError::format("unexpected tag <foo>");
        assert_eq!(e.to_string(), "format error: unexpected tag <foo>");
        assert!(e.is_format());
        assert!(!OcError::schema("x").is_format());
    }

    #[test]
    fn every_variant_is_constructed_by_a_helper() {
        for e in [
            OcError::format("a"),
            OcError::schema("b"),
            OcError::invalid_argument("c"),
        ] {
            let prefix = match &e {
                OcError::Format(_) => "format error: ",
                OcError::Schema(_) => "schema error: ",
                OcError::InvalidArgument(_) => "invalid argument: ",
            };
            assert!(e.to_string().starts_with(prefix), "{e}");
        }
    }
}
