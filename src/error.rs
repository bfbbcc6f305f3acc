//! Error types for card identification.
//!
//! Malformed card numbers and CVVs are ordinary input, not errors: the
//! runtime API answers them with `None` or `false`. The types here cover the
//! remaining cases, where the caller broke the API contract or the catalog
//! itself is malformed.

use std::fmt;

/// Errors raised at dynamically typed API boundaries.
///
/// These indicate a programming error by the caller, never a data-quality
/// problem with the card number itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A value of the wrong type was passed where a string was required.
    InvalidArgument {
        /// The type the operation accepts.
        expected: &'static str,
        /// The type that was actually supplied.
        found: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { expected, found } => {
                write!(f, "invalid argument: expected {}, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A single structural problem found in a catalog source.
///
/// `source` names where the problem sits, e.g. `elo[pattern 1]` or
/// `sources/visa.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    /// Scheme, file, or pattern the issue refers to.
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

impl CatalogIssue {
    /// Creates a new issue.
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Errors that prevent a catalog from being built.
#[derive(Debug)]
pub enum CatalogError {
    /// Failed to read a catalog file or directory.
    Io(std::io::Error),
    /// The catalog source is not syntactically valid.
    Parse(String),
    /// The catalog parsed, but failed structural validation.
    Invalid(Vec<CatalogIssue>),
}

impl CatalogError {
    /// Returns the structural issues, if this is a validation failure.
    pub fn issues(&self) -> &[CatalogIssue] {
        match self {
            Self::Invalid(issues) => issues,
            _ => &[],
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(s) => write!(f, "Parse error: {}", s),
            Self::Invalid(issues) => {
                write!(f, "catalog has {} structural error(s)", issues.len())?;
                for issue in issues {
                    write!(f, "\n  {}", issue)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CatalogIssue> for CatalogError {
    fn from(issue: CatalogIssue) -> Self {
        Self::Invalid(vec![issue])
    }
}
