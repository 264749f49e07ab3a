//! Error types for the environment provider SDK.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EnvironmentError {
    /// A recognized token could not be turned into a running service.
    /// The whole document is discarded.
    #[error("failed to construct environment for token '{token}': {message}")]
    ConstructionFailed { token: String, message: String },

    #[error("Internal error")]
    Internal,
}

impl EnvironmentError {
    #[must_use]
    pub fn construction_failed(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            token: token.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
