//! Decoding of response bodies.
//!
//! Success bodies are decoded straight into the caller's declared type;
//! there is no schema check beyond what serde enforces. Error bodies are
//! decoded as `{code, message, details?}`, either bare or wrapped in the
//! backend's `{"error": {...}}` object.
//!
//! # Examples
//!
//! ```rust
//! use atlas::net::json;
//!
//! let body = br#"{"error": {"code": "NOT_FOUND", "message": "Tool not found"}}"#;
//! let parsed = json::parse_error_body(body).unwrap();
//! assert_eq!(parsed.message, "Tool not found");
//! ```

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result, types::ApiErrorBody};

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorShape {
    Wrapped { error: ApiErrorBody },
    Flat(ApiErrorBody),
}

/// Decodes a success body as `T`.
///
/// An empty body (`204 No Content`) decodes as JSON `null`, so callers that
/// expect nothing can ask for `()`, `Option<_>` or [`Value`].
///
/// # Errors
///
/// * [`Error::Json`] - If the body does not match `T`
pub fn decode_success<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null).map_err(Into::into);
    }
    serde_json::from_slice(body).map_err(Into::into)
}

/// Parses an error body in either of its two shapes.
///
/// # Errors
///
/// * [`Error::Json`] - If the body is neither shape; this is returned as-is
///   instead of a synthesized API error
pub fn parse_error_body(body: &[u8]) -> Result<ApiErrorBody> {
    let shape: ErrorShape = serde_json::from_slice(body)?;
    Ok(match shape {
        ErrorShape::Wrapped { error } => error,
        ErrorShape::Flat(error) => error,
    })
}

/// Turns a non-success response into the error the caller sees.
pub fn decode_error(status: StatusCode, body: &[u8]) -> Error {
    match parse_error_body(body) {
        Ok(parsed) => Error::Api {
            status,
            code: parsed.code,
            message: parsed.message,
            details: parsed.details,
        },
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_success_body_is_null() {
        let unit: () = decode_success(b"").unwrap();
        assert_eq!(unit, ());

        let value: Value = decode_success(b"  \n").unwrap();
        assert!(value.is_null());

        assert!(decode_success::<Vec<u64>>(b"").is_err());
    }

    #[test]
    fn test_flat_error_body() {
        let error = decode_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"code": "PASSWORD_TOO_SHORT", "message": "password too short", "details": {"min": 8}}"#,
        );

        match error {
            Error::Api { status, code, message, details } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(code, "PASSWORD_TOO_SHORT");
                assert_eq!(message, "password too short");
                assert_eq!(details.unwrap()["min"], 8);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrapped_error_body_with_null_details() {
        let error = decode_error(
            StatusCode::NOT_FOUND,
            br#"{"error": {"code": "NOT_FOUND", "message": "Bookmark not found", "details": null}}"#,
        );
        assert_eq!(error.to_string(), "Bookmark not found");
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_unparseable_error_body_surfaces_json_error() {
        let error = decode_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert!(matches!(error, Error::Json(_)));
    }
}
