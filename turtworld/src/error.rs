//! Errors raised at the load boundary.
//!
//! The per-frame path (update, step, render, accessors) never fails; only
//! building a level or character from external data can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to parse data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid level data: {field} {reason}")]
    InvalidLevel { field: String, reason: String },

    #[error("invalid character data: {field} {reason}")]
    InvalidCharacter { field: String, reason: String },

    #[error("unknown character `{0}`")]
    UnknownCharacter(String),
}

impl CoreError {
    pub(crate) fn level(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLevel {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn character(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCharacter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
