//! Error kinds shared by every fallible operation in the crate.
//!
//! The original library returns a small integer status from every call and
//! surfaces an optional human-readable message through an out-parameter.
//! Idiomatic Rust collapses that into a single `Result<T, Error>`, with the
//! message carried inside the error itself rather than a side channel.

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds produced by ARI construction, codecs, and the type engine.
///
/// Every variant corresponds to one of the abstract error kinds in the
/// specification's error handling design; none of them carry process-level
/// side effects (no logging, no global error state).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Null or invalid input that the caller should have prevented.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The wire format did not even parse (malformed CBOR or URI text).
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Well-formed at the transport level but violates an ARI invariant.
    #[error("invalid ARI: {0}")]
    InvalidAri(String),

    /// A value does not satisfy the requested type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A value does not fit the target numeric domain.
    #[error("value out of range: {0}")]
    BadValue(String),

    /// A value passed its base type but failed a declarative constraint.
    #[error("constraint violation: {0}")]
    FailedConstraint(String),

    /// No union choice matched or converted.
    #[error("no matching union choice: {0}")]
    NoChoice(String),

    /// An access-control check failed during value production.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A capability (e.g. regular-expression matching) was compiled out.
    #[error("unimplemented: {0}")]
    Unimplemented(String),

    /// A conversion is not defined for the requested type (e.g. TP<->TD).
    #[error("non-convertible: {0}")]
    NullFunc(String),
}

impl Error {
    /// Shorthand for [`Error::Argument`].
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Shorthand for [`Error::Decoding`].
    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::Decoding(msg.into())
    }

    /// Shorthand for [`Error::InvalidAri`].
    pub fn invalid_ari(msg: impl Into<String>) -> Self {
        Self::InvalidAri(msg.into())
    }

    /// Shorthand for [`Error::TypeMismatch`].
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Shorthand for [`Error::BadValue`].
    pub fn bad_value(msg: impl Into<String>) -> Self {
        Self::BadValue(msg.into())
    }

    /// Shorthand for [`Error::FailedConstraint`].
    pub fn failed_constraint(msg: impl Into<String>) -> Self {
        Self::FailedConstraint(msg.into())
    }

    /// Shorthand for [`Error::NoChoice`].
    pub fn no_choice(msg: impl Into<String>) -> Self {
        Self::NoChoice(msg.into())
    }

    /// Shorthand for [`Error::PermissionDenied`].
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Shorthand for [`Error::Unimplemented`].
    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::Unimplemented(msg.into())
    }

    /// Shorthand for [`Error::NullFunc`].
    pub fn null_func(msg: impl Into<String>) -> Self {
        Self::NullFunc(msg.into())
    }
}
