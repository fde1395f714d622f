use thiserror::Error;

pub const EXHAUSTED_CODE: i64 = 503;
pub const EXHAUSTED_MESSAGE: &str = "all hosts unreachable";

/// Failure surfaced to the caller of a check.
///
/// Host-specific failures are consumed by the failover loop; only a service
/// rejection or the exhaustion of every host reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("update check rejected with code {code}: {message}")]
    Business { code: i64, message: String },
    #[error("all hosts unreachable after {attempts} attempt(s)")]
    Exhausted { attempts: usize },
}

impl CheckError {
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Business { code, .. } => *code,
            Self::Exhausted { .. } => EXHAUSTED_CODE,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Business { message, .. } => message,
            Self::Exhausted { .. } => EXHAUSTED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostListError {
    #[error("host list must contain at least one host")]
    Empty,
}
