//! Error types for definitions and value codecs.

use thiserror::Error;

/// Error codes grouping the error variants by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// V001: Symbol or value not found
    NotFound,
    /// V002: Conflicting symbol/value assignment
    ValueConflict,
    /// V003: Invalid argument supplied by the caller
    InvalidArgument,
    /// V004: Shared state unavailable
    Unavailable,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "V001",
            ErrorCode::ValueConflict => "V002",
            ErrorCode::InvalidArgument => "V003",
            ErrorCode::Unavailable => "V004",
        }
    }
}

/// Error raised by definition lookups and mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("[V001] {attribute}: no mapping for {key:?}")]
    NotFound { attribute: String, key: String },

    #[error(
        "[V002] {attribute}: {symbol:?} conflicts with existing mapping {existing:?} (requested {requested:?})"
    )]
    ValueConflict {
        attribute: String,
        symbol: String,
        existing: String,
        requested: String,
    },

    #[error("[V003] invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("[V004] definition {attribute:?} is unavailable (lock poisoned)")]
    LockPoisoned { attribute: String },
}

impl DefinitionError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DefinitionError::NotFound { .. } => ErrorCode::NotFound,
            DefinitionError::ValueConflict { .. } => ErrorCode::ValueConflict,
            DefinitionError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            DefinitionError::LockPoisoned { .. } => ErrorCode::Unavailable,
        }
    }

    pub(crate) fn not_found(attribute: &str, key: impl std::fmt::Debug) -> Self {
        DefinitionError::NotFound {
            attribute: attribute.to_string(),
            key: format!("{key:?}"),
        }
    }
}

/// Error raised by the codecs on library misuse.
///
/// Unparseable input is not an error: the parsing functions degrade to the
/// configured blank value instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("[V003] precision {precision} out of range [0, {max}]")]
    PrecisionOutOfRange { precision: u32, max: u32 },

    #[error("[V003] float value is NaN or infinite")]
    NonFiniteFloat,

    #[error("[V003] arithmetic overflow in {context}")]
    Overflow { context: &'static str },

    #[error("[V003] negative regex {pattern:?} has no `number` capture group")]
    InvalidNegativeRegex { pattern: String },
}

impl CodecError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}
