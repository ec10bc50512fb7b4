//! Error types for declaration, resolution, and execution failures.
//!
//! Validation *failures* are never errors: they are collected as
//! [`ConstraintViolation`](crate::ConstraintViolation)s and returned as data.
//! Everything in this module signals a defect in the declarations, the type
//! registry, or the plugin setup, and aborts the current call.

use thiserror::Error;

/// Coarse classification of a [`ValidatorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised while building specifications or metadata.
    Declaration,
    /// Raised while looking up a class or interface.
    Resolution,
    /// Raised while walking an object graph.
    Execution,
}

/// Errors raised by the validation engine.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// A constraint was declared without one or more options its plugin requires.
    #[error("constraint {constraint} on {class} is missing required option(s): {}", options.join(", "))]
    MissingOptions {
        /// Constraint name.
        constraint: String,
        /// Class the constraint was declared on.
        class: String,
        /// The required options that were not supplied.
        options: Vec<String>,
    },

    /// A constraint was declared with options its plugin does not support.
    #[error("constraint {constraint} on {class} does not support option(s): {}", options.join(", "))]
    InvalidOptions {
        /// Constraint name.
        constraint: String,
        /// Class the constraint was declared on.
        class: String,
        /// The unsupported options.
        options: Vec<String>,
    },

    /// A class declared a group sequence that cannot be evaluated.
    #[error("invalid group sequence on {class}: {reason}")]
    GroupSequence {
        /// Class declaring the sequence.
        class: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A type descriptor names itself as one of its own ancestors.
    #[error("inheritance cycle detected at {class}")]
    InheritanceCycle {
        /// The type at which the cycle was detected.
        class: String,
    },

    /// The class or interface is not registered in the type registry.
    #[error("unknown class: {class}")]
    UnknownClass {
        /// The class name that was looked up.
        class: String,
    },

    /// A property has no field, getter, or boolean accessor.
    #[error("property {property} of {class} is not readable (no field, getter, or boolean accessor)")]
    Access {
        /// Class owning the property.
        class: String,
        /// Property that could not be read.
        property: String,
    },

    /// No plugin is registered under the constraint's name.
    #[error("no validator registered for constraint {constraint}")]
    UnknownConstraint {
        /// Constraint name.
        constraint: String,
    },

    /// Traversal went deeper than the configured limit.
    #[error("object graph exceeds the maximum depth of {max_depth}")]
    DepthExceeded {
        /// The configured limit.
        max_depth: usize,
    },

    /// A metadata loader failed to produce declarations.
    #[error("metadata loader failed for {class}: {reason}")]
    Loader {
        /// Class being loaded.
        class: String,
        /// Loader-specific description.
        reason: String,
    },
}

impl ValidatorError {
    /// Convenience constructor for [`ValidatorError::UnknownClass`].
    pub fn unknown_class(class: impl Into<String>) -> Self {
        Self::UnknownClass {
            class: class.into(),
        }
    }

    /// Convenience constructor for [`ValidatorError::Access`].
    pub fn access(class: impl Into<String>, property: impl Into<String>) -> Self {
        Self::Access {
            class: class.into(),
            property: property.into(),
        }
    }

    /// Convenience constructor for [`ValidatorError::UnknownConstraint`].
    pub fn unknown_constraint(constraint: impl Into<String>) -> Self {
        Self::UnknownConstraint {
            constraint: constraint.into(),
        }
    }

    /// Convenience constructor for [`ValidatorError::GroupSequence`].
    pub fn group_sequence(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GroupSequence {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Returns the coarse classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingOptions { .. }
            | Self::InvalidOptions { .. }
            | Self::GroupSequence { .. }
            | Self::InheritanceCycle { .. }
            | Self::Loader { .. } => ErrorKind::Declaration,
            Self::UnknownClass { .. } => ErrorKind::Resolution,
            Self::Access { .. } | Self::UnknownConstraint { .. } | Self::DepthExceeded { .. } => {
                ErrorKind::Execution
            }
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ValidatorError> = std::result::Result<T, E>;
