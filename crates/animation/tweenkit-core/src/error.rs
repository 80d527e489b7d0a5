//! Error types for configuration and easing evaluation.

use thiserror::Error;

/// Raised synchronously when a configuration is built or loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("failed to parse stored tween: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Raised by an easing curve for a given progress value.
///
/// The driver never propagates this; a failing tick keeps the previous value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EasingError {
    #[error("easing produced a non-finite value at t = {t}")]
    NonFinite { t: f32 },
    #[error("easing failed at t = {t}: {message}")]
    Failed { t: f32, message: String },
}

impl EasingError {
    #[inline]
    pub fn progress(&self) -> f32 {
        match self {
            EasingError::NonFinite { t } | EasingError::Failed { t, .. } => *t,
        }
    }
}
