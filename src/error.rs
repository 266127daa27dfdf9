use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Unified error type for the Churn application
#[derive(Error, Debug)]
pub enum ChurnError {
    // Command execution errors
    #[error("failed to start process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{detail}")]
    NonZeroExit { code: i32, detail: String },

    #[error("process terminated by signal{}", .signal.map(|s| format!(" {s}")).unwrap_or_default())]
    SignalTermination { signal: Option<i32> },

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    // Filesystem errors
    #[error("failed to create workspace {}: {}", .path.display(), .source)]
    WorkspaceCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    // Validation errors
    #[error("package name must not be empty")]
    MissingPackageSpec,

    #[error("invalid package spec: {0}")]
    InvalidPackageSpec(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Proxy errors
    #[error("invalid proxy url: {0}")]
    InvalidProxyUrl(String),

    #[error("unsupported proxy scheme: {0}")]
    UnsupportedProxyScheme(String),

    // Prompt errors
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Churn operations
pub type Result<T> = std::result::Result<T, ChurnError>;

impl ChurnError {
    /// Check if this error came from running an external command
    pub fn is_execution_error(&self) -> bool {
        matches!(
            self,
            ChurnError::Spawn(_)
                | ChurnError::NonZeroExit { .. }
                | ChurnError::SignalTermination { .. }
                | ChurnError::Timeout(_)
        )
    }

    /// Check if this error should abort the run before any iteration starts
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ChurnError::MissingPackageSpec
                | ChurnError::InvalidPackageSpec(_)
                | ChurnError::InvalidConfig(_)
        )
    }
}

// Convert from URL parse errors
impl From<url::ParseError> for ChurnError {
    fn from(err: url::ParseError) -> Self {
        ChurnError::InvalidProxyUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ChurnError::Timeout(Duration::from_secs(1)).is_execution_error());
        assert!(ChurnError::NonZeroExit {
            code: 1,
            detail: "boom".to_string()
        }
        .is_execution_error());
        assert!(!ChurnError::MissingPackageSpec.is_execution_error());

        assert!(ChurnError::InvalidConfig("bad".to_string()).is_validation_error());
        assert!(ChurnError::InvalidPackageSpec("bad".to_string()).is_validation_error());
        assert!(!ChurnError::Timeout(Duration::from_secs(1)).is_validation_error());
    }

    #[test]
    fn test_signal_termination_display() {
        let with_signal = ChurnError::SignalTermination { signal: Some(9) };
        assert_eq!(with_signal.to_string(), "process terminated by signal 9");

        let unknown = ChurnError::SignalTermination { signal: None };
        assert_eq!(unknown.to_string(), "process terminated by signal");
    }

    #[test]
    fn test_non_zero_exit_displays_detail() {
        let err = ChurnError::NonZeroExit {
            code: 127,
            detail: "npm ERR! network timeout".to_string(),
        };
        assert_eq!(err.to_string(), "npm ERR! network timeout");
    }
}
