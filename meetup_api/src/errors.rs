//! Error types for the API client.

use url::Url;

use crate::types::Pages;

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The network call itself failed (connection refused, timeout, DNS).
    #[error("Request failed")]
    Transport(#[source] reqwest::Error),
    /// The response arrived but its body could not be drained.
    #[error("Failed to read response body")]
    Read(#[source] reqwest::Error),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The body did not match the expected envelope shape. The continuation
    /// URL is kept when the link header was readable on its own.
    #[error("Failed to decode response: {message}")]
    Decode { message: String, next: Option<Url> },
    /// Caller-supplied parameters were rejected before any network call.
    #[error("Invalid request: {0}")]
    Configuration(String),
    /// The run was cancelled or its deadline passed.
    #[error("Pagination cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// A pagination run that stopped early. Holds every page fetched before the
/// failure so callers can decide whether the partial result is usable.
#[derive(thiserror::Error, Debug)]
#[error("{error} after {} page(s)", .collected.len())]
pub struct PartialError {
    pub collected: Pages,
    #[source]
    pub error: Error,
}

impl PartialError {
    pub(crate) fn new(collected: Pages, error: Error) -> Self {
        Self { collected, error }
    }

    /// Discards the collected pages and keeps only the terminal error.
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl From<Error> for PartialError {
    fn from(error: Error) -> Self {
        Self::new(Pages::default(), error)
    }
}
