//! Violations and property paths.

use std::fmt;

use indexmap::IndexMap;

use crate::plugin::Failure;
use crate::value::Value;

// ============================================================================
// PROPERTY PATH
// ============================================================================

/// Dotted and indexed location of a value inside the validated graph.
///
/// The root is the empty path. `author.books[0].title` is built as
/// `root().property("author").property("books").index(0).property("title")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath(String);

impl PropertyPath {
    /// The empty path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Extends the path with a property name.
    #[must_use]
    pub fn property(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Extends the path with a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Extends the path with a map key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{key}]", self.0))
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// CONSTRAINT VIOLATION
// ============================================================================

/// One constraint that failed for one value at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Message with every parameter substituted.
    pub message: String,

    /// Message before substitution.
    pub message_template: String,

    /// Placeholder → value mapping, keys verbatim (e.g. `%limit%`).
    pub parameters: IndexMap<String, String>,

    /// The value validation started from.
    pub root: Value,

    /// Location of the invalid value, relative to the root.
    pub property_path: String,

    /// The value that failed.
    pub invalid_value: Value,

    /// Name of the failed constraint.
    pub constraint: String,
}

impl ConstraintViolation {
    /// Builds a violation, substituting `parameters` into `template`.
    pub fn new(
        template: impl Into<String>,
        parameters: IndexMap<String, String>,
        root: Value,
        path: &PropertyPath,
        invalid_value: Value,
        constraint: impl Into<String>,
    ) -> Self {
        let message_template = template.into();
        Self {
            message: render(&message_template, &parameters),
            message_template,
            parameters,
            root,
            property_path: path.as_str().to_owned(),
            invalid_value,
            constraint: constraint.into(),
        }
    }

    pub(crate) fn from_failure(
        failure: Failure,
        message_override: Option<&str>,
        root: Value,
        path: &PropertyPath,
        invalid_value: Value,
        constraint: &str,
    ) -> Self {
        let (template, parameters) = failure.into_parts();
        let template = message_override.map_or(template, str::to_owned);
        Self::new(template, parameters, root, path, invalid_value, constraint)
    }

    /// Looks up one substitution parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.property_path, self.message)
        }
    }
}

/// Substitutes every placeholder key with its value, verbatim.
#[must_use]
pub fn render(template: &str, parameters: &IndexMap<String, String>) -> String {
    parameters
        .iter()
        .fold(template.to_owned(), |message, (key, value)| {
            message.replace(key.as_str(), value)
        })
}

// ============================================================================
// VIOLATION LIST
// ============================================================================

/// Ordered violations collected during one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintViolationList {
    violations: Vec<ConstraintViolation>,
}

impl ConstraintViolationList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a violation.
    pub fn push(&mut self, violation: ConstraintViolation) {
        self.violations.push(violation);
    }

    /// Appends every violation from another list.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterates in the order violations were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, ConstraintViolation> {
        self.violations.iter()
    }

    /// Borrows the violations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    /// Violations recorded at exactly `path`.
    pub fn at_path<'l>(&'l self, path: &'l str) -> impl Iterator<Item = &'l ConstraintViolation> {
        self.violations
            .iter()
            .filter(move |v| v.property_path == path)
    }

    /// Rendered messages in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }
}

impl IntoIterator for ConstraintViolationList {
    type Item = ConstraintViolation;
    type IntoIter = std::vec::IntoIter<ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'l> IntoIterator for &'l ConstraintViolationList {
    type Item = &'l ConstraintViolation;
    type IntoIter = std::slice::Iter<'l, ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl FromIterator<ConstraintViolation> for ConstraintViolationList {
    fn from_iter<I: IntoIterator<Item = ConstraintViolation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Index<usize> for ConstraintViolationList {
    type Output = ConstraintViolation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.violations[index]
    }
}

impl fmt::Display for ConstraintViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
