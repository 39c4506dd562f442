use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;

/// Closed taxonomy of domain rule violations.
///
/// These are expected outcomes of a request, not failures of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    TeamExists,
    PrExists,
    PrMerged,
    NotAssigned,
    NoCandidate,
    NotFound,
    InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TeamExists => "TEAM_EXISTS",
            ErrorCode::PrExists => "PR_EXISTS",
            ErrorCode::PrMerged => "PR_MERGED",
            ErrorCode::NotAssigned => "NOT_ASSIGNED",
            ErrorCode::NoCandidate => "NO_CANDIDATE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every service operation.
///
/// `Domain` carries the taxonomy code and a human-readable message. `Storage`
/// wraps an infrastructure failure with the operation that hit it; its detail
/// must not reach external callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{code}: {message}")]
    Domain { code: ErrorCode, message: String },

    #[error("{operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ServiceError {
    pub fn domain(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError::Domain {
            code,
            message: message.into(),
        }
    }

    pub fn team_exists(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::TeamExists, message)
    }

    pub fn pr_exists(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::PrExists, message)
    }

    pub fn pr_merged(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::PrMerged, message)
    }

    pub fn not_assigned(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::NotAssigned, message)
    }

    pub fn no_candidate(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::NoCandidate, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::NotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::domain(ErrorCode::InvalidInput, message)
    }

    /// Wrap a repository failure with the name of the failing operation.
    pub fn storage(operation: &'static str, source: RepositoryError) -> Self {
        ServiceError::Storage { operation, source }
    }

    /// The taxonomy code, or `None` for infrastructure failures.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ServiceError::Domain { code, .. } => Some(*code),
            ServiceError::Storage { .. } => None,
        }
    }
}

/// Errors from repository operations (used by trait definitions in roster-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::NoCandidate).unwrap();
        assert_eq!(json, "\"NO_CANDIDATE\"");
        assert_eq!(ErrorCode::PrExists.to_string(), "PR_EXISTS");
    }

    #[test]
    fn test_domain_error_display() {
        let err = ServiceError::pr_merged("cannot reassign on merged PR");
        assert_eq!(err.to_string(), "PR_MERGED: cannot reassign on merged PR");
        assert_eq!(err.code(), Some(ErrorCode::PrMerged));
    }

    #[test]
    fn test_storage_error_has_no_code() {
        let err = ServiceError::storage("create_pr", RepositoryError::Connection);
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "create_pr: database connection error");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
