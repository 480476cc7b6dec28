//! Error types for flag retrieval, observation, and collapse.

use thiserror::Error;

/// Result type for store and controller operations.
pub type FlagResult<T> = Result<T, FlagError>;

/// Failures reported by a [`FlagSource`](crate::FlagSource).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// The service could not be reached or has not finished initializing
    #[error("Flag service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that is not a flag map
    #[error("Malformed flag payload: {0}")]
    Malformed(String),

    #[error("Failed to read flag file: {0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Why a single-flag observation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationIssue {
    /// No flag with that name is registered
    UnknownFlag,
    /// The descriptor's value is not a boolean
    NotBoolean,
}

impl std::fmt::Display for ObservationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFlag => f.write_str("flag is not registered"),
            Self::NotBoolean => f.write_str("flag value is not a boolean"),
        }
    }
}

/// User-visible failures. The `Display` text is the banner message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlagError {
    #[error("Failed to fetch features")]
    Retrieval(#[source] SourceError),

    #[error("Failed to observe state for {flag}")]
    Observation { flag: String, issue: ObservationIssue },

    #[error("Failed to collapse quantum states")]
    Collapse(String),
}

impl FlagError {
    /// Underlying cause, for logs rather than the banner.
    pub fn reason(&self) -> String {
        match self {
            Self::Retrieval(source) => source.to_string(),
            Self::Observation { issue, .. } => issue.to_string(),
            Self::Collapse(reason) => reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_messages() {
        let err = FlagError::Retrieval(SourceError::Unavailable("timeout".into()));
        assert_eq!(err.to_string(), "Failed to fetch features");
        assert_eq!(err.reason(), "Flag service unavailable: timeout");

        let err = FlagError::Observation {
            flag: "Z".into(),
            issue: ObservationIssue::UnknownFlag,
        };
        assert_eq!(err.to_string(), "Failed to observe state for Z");

        let err = FlagError::Collapse("registry is empty".into());
        assert_eq!(err.to_string(), "Failed to collapse quantum states");
        assert_eq!(err.reason(), "registry is empty");
    }
}
