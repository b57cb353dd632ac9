//! Error types for policy decoding.
//!
//! A decode either fails at the document level (unreadable file, TOML
//! syntax error) or with a list of field-level [`Issue`]s collected across
//! the whole file, so an author can fix everything in one pass.

use thiserror::Error;

/// Result type alias for policy decode operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors returned by the policy decoder.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed into a table tree at all. The
    /// underlying parser error is surfaced verbatim; nothing below the
    /// tree level can be reported.
    #[error("failed to parse {origin}: {source}")]
    Syntax {
        origin: String,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// The document parsed but one or more policies failed validation.
    /// Every finding for the file is attached; no partial policy map is
    /// returned.
    #[error("invalid policy document {origin}: {}", join_issues(.issues))]
    Invalid { origin: String, issues: Vec<Issue> },
}

impl PolicyError {
    /// The field-level findings, when this is a validation failure.
    pub fn issues(&self) -> &[Issue] {
        match self {
            PolicyError::Invalid { issues, .. } => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One field-level validation finding, anchored to the block it occurred
/// in (`block` is a human-readable path like `scaling "web": check "cpu"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("{block}: expected a table, found {found}")]
    NotATable { block: String, found: &'static str },

    #[error("{block}: missing required attribute \"{attribute}\"")]
    MissingAttribute {
        block: String,
        attribute: &'static str,
    },

    #[error("{block}: attribute \"{attribute}\" must not be empty")]
    EmptyAttribute {
        block: String,
        attribute: &'static str,
    },

    #[error("{block}: attribute \"{attribute}\": expected {expected}, found {found}")]
    WrongType {
        block: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{block}: attribute \"{attribute}\": invalid duration \"{value}\": {reason}")]
    BadDuration {
        block: String,
        attribute: &'static str,
        value: String,
        reason: String,
    },

    #[error("{block}: missing required \"{name}\" block")]
    MissingBlock { block: String, name: &'static str },

    #[error("{block}: expected exactly one \"{name}\" block, found {count}")]
    BlockCount {
        block: String,
        name: &'static str,
        count: usize,
    },

    #[error("{block}: policy must declare at least one \"check\" block")]
    NoChecks { block: String },

    #[error("{block}: duplicate check name \"{name}\"")]
    DuplicateCheckName { block: String, name: String },

    #[error("duplicate policy name \"{name}\"")]
    DuplicatePolicyName { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_error_joins_all_issues() {
        let err = PolicyError::Invalid {
            origin: "policies.toml".to_string(),
            issues: vec![
                Issue::MissingAttribute {
                    block: "scaling \"web\"".to_string(),
                    attribute: "query",
                },
                Issue::NoChecks {
                    block: "scaling \"db\"".to_string(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("policies.toml"));
        assert!(text.contains("missing required attribute \"query\""));
        assert!(text.contains("at least one \"check\" block"));
    }

    #[test]
    fn issue_display_names_the_block() {
        let issue = Issue::BlockCount {
            block: "scaling \"web\": check \"cpu\"".to_string(),
            name: "strategy",
            count: 2,
        };
        assert_eq!(
            issue.to_string(),
            "scaling \"web\": check \"cpu\": expected exactly one \"strategy\" block, found 2"
        );
    }
}
