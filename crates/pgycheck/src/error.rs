use pgycheck_core::{CheckError, TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no API key configured: pass --api-key, set PGYCHECK_API_KEY or add \"api_key\" to {settings}")]
    MissingApiKey { settings: String },

    #[error("failed to set up HTTP transport: {0}")]
    Transport(#[from] TransportError),

    #[error("error {}: {}", .0.code(), .0.message())]
    Check(#[from] CheckError),

    #[error("failed to save settings: {0}")]
    SettingsSave(#[source] std::io::Error),

    #[error("failed to render update info: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    pub fn missing_api_key(settings: impl Into<String>) -> Self {
        Self::MissingApiKey {
            settings: settings.into(),
        }
    }

    /// `1` when the check itself failed, `2` for local setup problems.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Check(_) => 1,
            Self::MissingApiKey { .. }
            | Self::Transport(_)
            | Self::SettingsSave(_)
            | Self::Output(_) => 2,
        }
    }
}
