//! Validation errors surfaced to the user.

use thiserror::Error;

/// Problems with the fields of an inspection form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Name is required")]
    EmptyName,
    #[error("Number must be a positive integer")]
    InvalidNumber,
    #[error("Number {0} is already in use")]
    DuplicateNumber(i64),
}
