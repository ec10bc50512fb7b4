//! Error types for declaration loading.

use std::path::PathBuf;

use thiserror::Error;
use vigil_validator::ValidatorError;

/// Failures while reading or interpreting a declaration document.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The content is not a well-formed document.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// An option value cannot be represented.
    #[error("option {option} of constraint {constraint} is invalid: {reason}")]
    Option {
        /// Constraint carrying the option.
        constraint: String,
        /// Option name.
        option: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The document parsed but its declarations are malformed.
    #[error(transparent)]
    Declaration(#[from] ValidatorError),
}

impl LoaderError {
    /// Convenience constructor for [`LoaderError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`LoaderError::Option`].
    pub fn option(
        constraint: impl Into<String>,
        option: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Option {
            constraint: constraint.into(),
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Wraps this error for a [`MetadataLoader`](vigil_validator::MetadataLoader)
    /// answering for `class`.
    pub fn into_validator_error(self, class: impl Into<String>) -> ValidatorError {
        match self {
            Self::Declaration(err) => err,
            other => ValidatorError::Loader {
                class: class.into(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result alias for this crate.
pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = LoaderError::io(
            "/etc/vigil/author.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(
            err.to_string(),
            "failed to read /etc/vigil/author.json: no such file"
        );
    }

    #[test]
    fn declaration_errors_pass_through_unwrapped() {
        let inner = ValidatorError::group_sequence("Author", "sequence is empty");
        let expected = inner.to_string();
        let wrapped = LoaderError::from(inner).into_validator_error("Book");
        assert!(matches!(wrapped, ValidatorError::GroupSequence { .. }));
        assert_eq!(wrapped.to_string(), expected);
    }

    #[test]
    fn other_errors_become_loader_errors() {
        let err = LoaderError::option("All", "constraints", "expected a list")
            .into_validator_error("Author");
        assert!(matches!(err, ValidatorError::Loader { ref class, .. } if class == "Author"));
    }
}
