//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid plans and parameters, malformed images (empty, wrong channel count,
//! mismatched dimensions), and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{role} image is empty ({width}x{height})")]
    EmptyImage {
        role: &'static str,
        width: usize,
        height: usize,
    },

    #[error("{role} has {found} channels, expected {expected}")]
    ChannelMismatch {
        role: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{role} is {}x{}, expected {}x{}", .found.0, .found.1, .expected.0, .expected.1)]
    DimensionMismatch {
        role: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
