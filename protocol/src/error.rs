//! Crate-level error types.
//!
//! Each layer returns its own error: [`CryptoError`] from `crypto`,
//! [`EncodingError`] from `schema` and the transaction codec,
//! [`IdentifierCollisionError`] from the id generator, and
//! [`ValidationError`] from builders and model constructors. [`Error`]
//! gathers all four for callers that want one type.

use thiserror::Error;

pub use crate::crypto::error::CryptoError;
pub use crate::model::id_generator::IdentifierCollisionError;
pub use crate::schema::EncodingError;

/// A caller-supplied value broke a field constraint.
///
/// Always names the offending field so the caller can fix the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// The field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidField { field, .. } | Self::MissingField { field } => field,
        }
    }
}

/// Any failure the crate can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    IdentifierCollision(#[from] IdentifierCollisionError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
