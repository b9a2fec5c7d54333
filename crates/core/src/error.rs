/// Errors raised while setting up or resolving validation rules.
///
/// Validation failures are never errors: they are recorded in the model's
/// [`ErrorBag`](crate::error_bag::ErrorBag). Every variant here is a
/// configuration problem the caller has to fix.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown validator kind: '{kind}'")]
    UnknownValidator { kind: String },

    #[error("Invalid option '{option}' for validator '{kind}': {reason}")]
    InvalidOption {
        kind: String,
        option: String,
        reason: String,
    },
}

impl CoreError {
    /// All variants describe structurally invalid setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::UnknownValidator { .. } | Self::InvalidOption { .. }
        )
    }

    pub(crate) fn invalid_option(kind: &str, option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            kind: kind.to_string(),
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}
