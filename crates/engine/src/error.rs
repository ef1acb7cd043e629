//! The module contains the errors the engine can throw.
//!
//! Conversion errors:
//!
//! - [`UnknownUnit`] thrown when a unit symbol is not in the unit table and
//!   the caller needs an exact category (normalization paths).
//! - [`InvalidQuantity`] thrown when a per-unit price is derived from a
//!   non-positive quantity.
//!
//! The ratio/pricing path never fails on unknown symbols: it falls back to an
//! identity ratio (see [`ratio`]).
//!
//!  [`UnknownUnit`]: EngineError::UnknownUnit
//!  [`InvalidQuantity`]: EngineError::InvalidQuantity
//!  [`ratio`]: crate::conversion::ratio
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown unit: \"{0}\"")]
    UnknownUnit(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
    #[error("Unit table misconfigured: {0}")]
    Configuration(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownUnit(a), Self::UnknownUnit(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Overflow(a), Self::Overflow(b)) => a == b,
            (Self::Configuration(a), Self::Configuration(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
