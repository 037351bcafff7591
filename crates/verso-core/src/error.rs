use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all verso operations.
#[derive(Debug, Error, Diagnostic)]
pub enum VersionError {
    /// A version string does not match its scheme's grammar.
    #[error("Invalid version: {message}")]
    #[diagnostic(help("Check the version against the ecosystem's version grammar"))]
    Version { message: String },

    /// A constraint expression is malformed or combines operators nonsensically.
    #[error("Invalid constraint: {message}")]
    Constraint { message: String },

    /// A calendar version format specification is malformed.
    #[error("Invalid format specification: {message}")]
    #[diagnostic(help(
        "Format specs combine tokens like YYYY, MM, 0D, MAJOR with '.', '-' or '_' separators"
    ))]
    Format { message: String },
}

impl VersionError {
    /// Shorthand for a [`VersionError::Version`] with a formatted message.
    pub fn version(message: impl Into<String>) -> Self {
        Self::Version {
            message: message.into(),
        }
    }

    /// Shorthand for a [`VersionError::Constraint`] with a formatted message.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint {
            message: message.into(),
        }
    }

    /// Shorthand for a [`VersionError::Format`] with a formatted message.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

/// Convenience alias used by every fallible operation in verso.
pub type VersionResult<T> = std::result::Result<T, VersionError>;
