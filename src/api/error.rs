//! API Error Types
//!
//! Classifies backend failures into the three kinds the client reacts to:
//! transport failures, server-reported errors, and rejected sessions.

use serde_json::Value;
use thiserror::Error;

use super::transport::TransportError;

/// Message shown for any transport-level failure
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Errors returned by [`super::PlantApi`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(#[from] TransportError),

    /// 401 on an authenticated call, or no token to send
    #[error("Session expired. Please log in again.")]
    Unauthorized,

    /// Non-2xx response, with the message from its JSON body if any
    #[error("{}", server_text(.status, .message))]
    Server { status: u16, message: Option<String> },

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn server_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Request failed with status {}", status),
    }
}

impl ApiError {
    /// Message extracted from the server's error body
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text for an inline form notice: the server's message, the network
    /// message, or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Auth endpoints answer `{"msg": ...}`, plant endpoints `{"error": ...}`.
pub fn extract_server_message(body: Option<&Value>) -> Option<String> {
    let body = body?;
    ["msg", "error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
