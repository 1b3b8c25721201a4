//! Error model for value objects.

use thiserror::Error;

/// Result type used across the wholeable crates.
pub type WholeResult<T> = Result<T, WholeError>;

/// Value-object error.
///
/// Every error is local to the single offending call and leaves the instance
/// untouched. Comparing against a foreign type is deliberately not an error:
/// equality answers `false` and diffing falls back to the foreign branch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WholeError {
    /// A write was attempted on a frozen instance.
    #[error("can't modify frozen {type_name}: {field}=")]
    FrozenState { type_name: String, field: String },

    /// A write was attempted on a field no mutable layer exposed as writable.
    #[error("undefined method '{field}=' for {type_name}")]
    UndefinedWrite { type_name: String, field: String },

    /// A value was supplied for a name outside the canonical field list.
    #[error("unknown field '{field}' for {type_name}")]
    UnknownField { type_name: String, field: String },

    /// Construction found neither a supplied value nor a default.
    #[error("missing value for field '{field}' of {type_name}")]
    MissingField { type_name: String, field: String },

    /// A type identifier or name was not registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A type name was registered twice.
    #[error("type already defined: {0}")]
    DuplicateType(String),

    /// Input handed to a constructor had the wrong shape.
    #[error("invalid input for {type_name}: {reason}")]
    InvalidInput { type_name: String, reason: String },

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl WholeError {
    pub fn frozen_state(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FrozenState {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn undefined_write(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UndefinedWrite {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn missing_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn invalid_input(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_type(msg: impl Into<String>) -> Self {
        Self::UnknownType(msg.into())
    }

    pub fn duplicate_type(msg: impl Into<String>) -> Self {
        Self::DuplicateType(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
