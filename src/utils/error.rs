use thiserror::Error;

/// Terminal failure kinds of a single roadmap generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    NoResults,
    UpstreamError,
    PersistenceError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

#[derive(Error, Debug)]
pub enum RoadmapError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("No resources found for query: {query}")]
    NoResults { query: String },

    #[error("Search provider error{}: {message}", http_status_suffix(.status))]
    Upstream { status: Option<u16>, message: String },

    #[error("Failed to persist roadmap: {message}")]
    Persistence { message: String },

    #[error("A roadmap request is already in progress for {caller}")]
    AlreadyInProgress { caller: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RoadmapError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// The pipeline failure kind this error represents, if any.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::InvalidInput { .. } => Some(FailureKind::InvalidInput),
            Self::NoResults { .. } => Some(FailureKind::NoResults),
            Self::Upstream { .. } => Some(FailureKind::UpstreamError),
            Self::Persistence { .. } => Some(FailureKind::PersistenceError),
            _ => None,
        }
    }

    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::NoResults { .. } | Self::AlreadyInProgress { .. }
        )
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput { .. } | Self::NoResults { .. } | Self::AlreadyInProgress { .. } => {
                ErrorSeverity::Medium
            }
            Self::Upstream { .. } | Self::Persistence { .. } => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { .. } => {
                "Please provide at least one of job profile, qualification, skills or interests."
                    .to_string()
            }
            Self::NoResults { .. } => "No resources found. Please refine your inputs.".to_string(),
            Self::Upstream { .. } => format!(
                "An error occurred: {}. Please check your internet connection or server status.",
                self
            ),
            Self::Persistence { .. } => format!(
                "An error occurred: {}. Your roadmap was not saved, please try again.",
                self
            ),
            Self::AlreadyInProgress { .. } => {
                "Your roadmap is still being generated, please wait.".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Fill in at least one profile field and submit again",
            Self::NoResults { .. } => "Broaden your skills or interests and submit again",
            Self::Upstream { .. } => {
                "Check the search API key, engine id and network connectivity, then retry"
            }
            Self::Persistence { .. } => "Check the record store is reachable and writable, then retry",
            Self::AlreadyInProgress { .. } => "Wait for the current request to finish",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or environment variables",
            Self::IoError(_) => "Check file permissions and available disk space",
            Self::SerializationError(_) => "Check the stored data is valid JSON",
        }
    }
}

pub type Result<T> = std::result::Result<T, RoadmapError>;

fn http_status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let err = RoadmapError::InvalidInput {
            message: "empty".to_string(),
        };
        assert_eq!(err.kind(), Some(FailureKind::InvalidInput));
        assert!(err.is_user_correctable());

        let err = RoadmapError::upstream(Some(403), "quota exceeded");
        assert_eq!(err.kind(), Some(FailureKind::UpstreamError));
        assert!(!err.is_user_correctable());
        assert_eq!(err.to_string(), "Search provider error (HTTP 403): quota exceeded");

        let err = RoadmapError::persistence("disk full");
        assert_eq!(err.kind(), Some(FailureKind::PersistenceError));
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = RoadmapError::MissingConfigError {
            field: "search.api_key".to_string(),
        };
        assert_eq!(err.kind(), None);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_upstream_without_status() {
        let err = RoadmapError::upstream(None, "timed out after 10s");
        assert_eq!(err.to_string(), "Search provider error: timed out after 10s");
    }

    #[test]
    fn test_no_results_message() {
        let err = RoadmapError::NoResults {
            query: "rust".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "No resources found. Please refine your inputs."
        );
    }
}
