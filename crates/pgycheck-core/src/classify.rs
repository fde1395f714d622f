use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::CheckError;
use crate::model::{UpdateInfo, lenient};
use crate::transport::{RawResponse, TransportError};

pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown error";

/// Result of a single host attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    NetworkError(String),
    HttpStatusError(StatusCode),
    BodyMissing,
    ParseError(String),
    BusinessError { code: i64, message: String },
    MissingDataError,
    Decoded(UpdateInfo),
}

impl AttemptOutcome {
    /// The check result this outcome ends the failover loop with, or `None`
    /// when the next host should be tried.
    #[must_use]
    pub fn into_terminal(self) -> Option<Result<UpdateInfo, CheckError>> {
        match self {
            Self::Decoded(info) => Some(Ok(info)),
            Self::BusinessError { code, message } => {
                Some(Err(CheckError::Business { code, message }))
            }
            Self::NetworkError(_)
            | Self::HttpStatusError(_)
            | Self::BodyMissing
            | Self::ParseError(_)
            | Self::MissingDataError => None,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.clone().into_terminal().is_none()
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError(details) => write!(f, "network error: {details}"),
            Self::HttpStatusError(status) => write!(f, "HTTP {status}"),
            Self::BodyMissing => write!(f, "response body missing"),
            Self::ParseError(details) => write!(f, "response parse failed: {details}"),
            Self::BusinessError { code, message } => {
                write!(f, "service error {code}: {message}")
            }
            Self::MissingDataError => write!(f, "response has no data object"),
            Self::Decoded(_) => write!(f, "update info decoded"),
        }
    }
}

/// Classify the transport result of one attempt.
#[must_use]
pub fn classify(result: &Result<RawResponse, TransportError>) -> AttemptOutcome {
    let response = match result {
        Ok(response) => response,
        Err(error) => return AttemptOutcome::NetworkError(error.to_string()),
    };

    if !response.status.is_success() {
        return AttemptOutcome::HttpStatusError(response.status);
    }

    let Some(body) = response.body.as_deref().filter(|body| !body.is_empty()) else {
        return AttemptOutcome::BodyMissing;
    };

    classify_body(body)
}

fn classify_body(body: &[u8]) -> AttemptOutcome {
    let envelope = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(envelope)) => envelope,
        Ok(other) => {
            return AttemptOutcome::ParseError(format!("expected JSON object, got {}", kind(&other)));
        }
        Err(error) => return AttemptOutcome::ParseError(error.to_string()),
    };

    let code: i64 = lenient(&envelope, "code", Value::as_i64);
    if code != 0 {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string();
        return AttemptOutcome::BusinessError { code, message };
    }

    match envelope.get("data") {
        Some(Value::Object(data)) => AttemptOutcome::Decoded(UpdateInfo::from_data(data)),
        _ => AttemptOutcome::MissingDataError,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
