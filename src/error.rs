//! Errors returned by the generator.

use std::collections::TryReserveError;

/// Failure of a single [`generate`](crate::FractalRenderer::generate) call.
///
/// Every variant is terminal for the call that produced it; no partial image is
/// ever handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller asked for an image size that cannot exist.
    InvalidArgument(String),
    /// The render configuration cannot describe a valid field.
    Config(String),
    /// The escape field or the output image could not be allocated.
    ResourceExhausted(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(message) => write!(f, "invalid argument: {}", message),
            Error::Config(message) => write!(f, "invalid configuration: {}", message),
            Error::ResourceExhausted(message) => write!(f, "resource exhausted: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::ResourceExhausted(err.to_string())
    }
}
