//! Error types and result handling for Atlas operations.
//!
//! This module defines the error handling system used throughout the crate.
//! All operations return a [`Result<T>`] which is a type alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! Atlas errors fall into three groups:
//!
//! - **Transport failures**: the backend could not be reached ([`Error::Network`])
//!   or answered with a non-success status and a structured body ([`Error::Api`])
//! - **Application failures**: a body did not have the expected shape
//!   ([`Error::Json`], [`Error::Parse`]) or local state could not be stored
//!   ([`Error::Io`], [`Error::Storage`])
//! - **Rejected mutations**: a mutation for the same entity is already running
//!   ([`Error::InFlight`])
//!
//! An absent session is not an error at all: [`SessionStore::fetch_current_user`]
//! settles into the signed-out state instead.
//!
//! [`SessionStore::fetch_current_user`]: crate::store::SessionStore::fetch_current_user
//!
//! # Examples
//!
//! ```rust
//! use atlas::{Error, Result};
//!
//! fn describe(result: Result<()>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(e) if e.is_unauthorized() => "please sign in".to_string(),
//!         Err(Error::Network(e)) => format!("backend unreachable: {}", e),
//!         Err(e) => e.to_string(),
//!     }
//! }
//! ```

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Type alias for Results with Atlas errors.
///
/// # Examples
///
/// ```rust
/// use atlas::{Error, Result};
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::parse("unexpected payload"))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all Atlas operations.
///
/// # Variants
///
/// * [`Network`](Error::Network) - HTTP client and connection errors
/// * [`Api`](Error::Api) - Non-success responses carrying a backend error body
/// * [`Json`](Error::Json) - JSON serialization errors
/// * [`Parse`](Error::Parse) - Data that is valid JSON but not usable
/// * [`NotFound`](Error::NotFound) - Unknown routes or missing route parameters
/// * [`Io`](Error::Io) - File system errors from durable state
/// * [`Storage`](Error::Storage) - Persisted state that cannot be read back
/// * [`InFlight`](Error::InFlight) - Overlapping mutation of the same entity
/// * [`Other`](Error::Other) - Generic error messages
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors from HTTP operations.
    ///
    /// Wraps errors from reqwest: connection refused, DNS failures, timeouts,
    /// TLS problems.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// The display form is the server-provided `message`, so the error can
    /// be shown to users as-is.
    ///
    /// # Fields
    ///
    /// * `status` - HTTP status of the response
    /// * `code` - Machine-readable error code (e.g. `NOT_FOUND`)
    /// * `message` - Human-readable message from the backend
    /// * `details` - Optional structured details
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
        details: Option<Value>,
    },

    /// JSON serialization and deserialization errors.
    ///
    /// Produced when a success body does not match the declared type, and
    /// also when an error body cannot be parsed as `{code, message}`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data parsing and format errors.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A named resource (route, path parameter) that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// File system errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state that cannot be interpreted.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A mutation for the same entity is still waiting for the backend.
    #[error("Mutation already in flight for {0}")]
    InFlight(String),

    /// Generic error messages.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a parse error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use atlas::Error;
    ///
    /// let error = Error::parse("missing user in login response");
    /// assert!(error.to_string().contains("missing user"));
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a not found error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use atlas::Error;
    ///
    /// let error = Error::not_found("route parameter 'slug'");
    /// assert!(error.to_string().contains("slug"));
    /// ```
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a storage error with the given message.
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Creates an in-flight error naming the contested entity.
    pub fn in_flight(what: impl Into<String>) -> Self {
        Error::InFlight(what.into())
    }

    /// Creates an API error from its parts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use atlas::Error;
    /// use reqwest::StatusCode;
    ///
    /// let error = Error::api(StatusCode::NOT_FOUND, "NOT_FOUND", "Tool not found");
    /// assert_eq!(error.to_string(), "Tool not found");
    /// assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    /// ```
    pub fn api(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Returns the HTTP status behind this error, if there is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns `true` when the backend rejected the request for lack of a session.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_message() {
        let error = Error::Api {
            status: StatusCode::CONFLICT,
            code: "ALREADY_BOOKMARKED".to_string(),
            message: "Tool is already bookmarked".to_string(),
            details: None,
        };

        assert_eq!(error.to_string(), "Tool is already bookmarked");
        assert_eq!(error.status(), Some(StatusCode::CONFLICT));
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn unauthorized_is_detected() {
        let error = Error::api(StatusCode::UNAUTHORIZED, "unauthorized", "Authentication required");
        assert!(error.is_unauthorized());
        assert!(Error::parse("x").status().is_none());
    }
}
