//! Error types for the Ajera API client.
//!
//! # Design
//! Session misuse, server-reported failures, schema mismatches and transport
//! failures are distinct variants because callers react to them differently:
//! a `SessionError` is a programming error, an `ApiError` carries the request
//! that provoked it, and a `SchemaValidationError` names the offending field
//! path. None of them are retried by the client.

use serde_json::Value;
use thiserror::Error;

/// Crate-level result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure a client call can surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request record could not be encoded as JSON.
    #[error("request serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Session state machine violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please start a session first")]
    NotStarted,

    #[error("cannot start session; session already active")]
    AlreadyActive,
}

/// The server answered with a non-empty `Errors` list.
///
/// `request` is the JSON body that was sent, with the password masked.
#[derive(Debug, Clone, Error)]
#[error("{method} failed (response code {response_code:?}): {}", summarize(.errors))]
pub struct ApiError {
    pub method: &'static str,
    pub response_code: Option<i64>,
    pub message: Option<String>,
    pub errors: Vec<Value>,
    pub request: Value,
}

/// A payload did not match its declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema validation failed at `{path}`: {message}")]
pub struct SchemaValidationError {
    /// Dotted wire path, e.g. `Content.Projects[0].ProjectKey`; `.` for the root.
    pub path: String,
    pub message: String,
}

impl From<serde_path_to_error::Error<serde_json::Error>> for SchemaValidationError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        }
    }
}

/// Failures below the envelope: the round trip itself, or a body that is not JSON.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("response body is not valid JSON (HTTP {status}): {source}")]
    MalformedBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

fn summarize(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|error| match error {
            Value::String(text) => text.clone(),
            Value::Object(map) => map
                .get("ErrorMessage")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), str::to_string),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
