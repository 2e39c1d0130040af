//! Error taxonomy for backend calls.

use serde_json::Value;

const FALLBACK_MESSAGE: &str = "Request failed";

/// A non-2xx answer from the backend: the status plus whatever JSON body came
/// with it (`{}` when the body was empty or not JSON).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{}", self.user_friendly_message())]
pub struct ApiError {
    status: u16,
    data: Value,
}

impl ApiError {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    pub(crate) fn timeout() -> Self {
        Self::new(
            504,
            serde_json::json!({"error": "Request timed out."}),
        )
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Raw server message: a plain string body, then `detail`, then `error`,
    /// then a `field: e1, e2; other: e3` rendering of a validation payload.
    pub fn messages(&self) -> String {
        match &self.data {
            Value::Null => FALLBACK_MESSAGE.to_string(),
            Value::String(s) => s.clone(),
            Value::Object(map) => {
                for key in ["detail", "error"] {
                    if let Some(v) = map.get(key).filter(|v| is_truthy(v)) {
                        return text_of(v);
                    }
                }
                let joined = map
                    .iter()
                    .map(|(field, errors)| format!("{}: {}", field, join_errors(errors)))
                    .collect::<Vec<_>>()
                    .join("; ");
                if joined.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    joined
                }
            }
            other => other.to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.status {
            429 => "Rate limit exceeded. Please wait a moment and try again.".to_string(),
            503 => "Smartsheet is under maintenance. Try again later.".to_string(),
            504 => "Request timed out. Please try again.".to_string(),
            _ => self.messages(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.status, 429 | 503 | 504)
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_errors(errors: &Value) -> String {
    match errors {
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join(", "),
        other => text_of(other),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable refresh path: tokens were cleared and the session is over.
    #[error("session expired; sign in again")]
    SessionExpired,

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} returned no content")]
    EmptyResponse(String),

    #[error("token store: {0:#}")]
    Store(anyhow::Error),
}

impl ClientError {
    /// Timeouts become a 504 so they classify as retryable like a gateway timeout.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Api(ApiError::timeout())
        } else {
            ClientError::Transport(err)
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.api().map(ApiError::status)
    }

    pub fn is_retryable(&self) -> bool {
        self.api().is_some_and(ApiError::is_retryable)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(e) => e.user_friendly_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/remote/error_tests.rs"]
mod tests;
