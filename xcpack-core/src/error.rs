//! Error types for packaging
//!
//! Every variant of [`PackagingError`] is terminal: the pipeline stops at the
//! first one and reports it. [`FixupWarning`] is the only non-terminal
//! condition and is logged instead of returned.

use std::fmt;
use std::path::PathBuf;

use crate::substitution::CoverageIssue;

/// Why an app identifier was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierProblem {
    /// Contains a character other than a letter, digit, `.` or `_`
    InvalidCharacter(char),
    /// Nothing left after substitution
    Empty,
}

impl fmt::Display for IdentifierProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierProblem::InvalidCharacter(c) => write!(
                f,
                "contains invalid character '{}'. Only letters, numbers, dots and underscore characters are allowed",
                c
            ),
            IdentifierProblem::Empty => write!(f, "is empty"),
        }
    }
}

/// Terminal packaging failures
#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("Apple app identifier '{identifier}' {problem}")]
    InvalidIdentifier {
        identifier: String,
        problem: IdentifierProblem,
    },

    #[error("Failed to deploy Xcode project to {} from {}: {source}", .to.display(), .from.display())]
    Deployment {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan build output in {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to format Xcode project {}: {source}", .path.display())]
    Substitution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Placeholder coverage check failed for {}: {}", .path.display(), join_issues(.issues))]
    Coverage {
        path: PathBuf,
        issues: Vec<CoverageIssue>,
    },
}

fn join_issues(issues: &[CoverageIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A failed identity rewrite on one library. Logged, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{tool} failed for {library} ({reason})")]
pub struct FixupWarning {
    pub tool: String,
    pub library: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_reports_offending_string() {
        let err = PackagingError::InvalidIdentifier {
            identifier: "com.acme!.game".to_string(),
            problem: IdentifierProblem::InvalidCharacter('!'),
        };
        let message = err.to_string();
        assert!(message.contains("'com.acme!.game'"));
        assert!(message.contains("'!'"));
    }

    #[test]
    fn test_empty_identifier_message() {
        let err = PackagingError::InvalidIdentifier {
            identifier: String::new(),
            problem: IdentifierProblem::Empty,
        };
        assert_eq!(err.to_string(), "Apple app identifier '' is empty");
    }

    #[test]
    fn test_deployment_error_names_both_paths() {
        let err = PackagingError::Deployment {
            from: PathBuf::from("/engine/iOS/Project"),
            to: PathBuf::from("/out"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = err.to_string();
        assert!(message.contains("/engine/iOS/Project"));
        assert!(message.contains("/out"));
    }

    #[test]
    fn test_coverage_error_lists_issues() {
        let err = PackagingError::Coverage {
            path: PathBuf::from("project.pbxproj"),
            issues: vec![
                CoverageIssue::MissingPlaceholder("${Orientation}".to_string()),
                CoverageIssue::UnusedToken("${AppTeamId}".to_string()),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("${Orientation}"));
        assert!(message.contains("${AppTeamId}"));
    }
}
