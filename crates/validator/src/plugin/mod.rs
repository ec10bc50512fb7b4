//! The validator plugin contract.
//!
//! A plugin checks one value against one constraint declaration and reports
//! [`Outcome::Valid`] or an [`Outcome::Invalid`] failure carrying a message
//! template and its parameters. Structural plugins (such as `Valid`, `All`
//! and `Any`) use the [`ConstraintScope`] to recurse into the engine.

mod registry;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

pub use registry::ConstraintRegistry;

use crate::engine::ConstraintScope;
use crate::error::Result;
use crate::spec::ConstraintSpecification;
use crate::value::Value;

/// A failed check: message template plus placeholder values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    template: String,
    parameters: IndexMap<String, String>,
}

impl Failure {
    /// Creates a failure with the given message template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            parameters: IndexMap::new(),
        }
    }

    /// Adds a placeholder value. The key is matched verbatim in the template.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.insert(key.into(), value.to_string());
        self
    }

    /// Message template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder values.
    #[must_use]
    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    pub(crate) fn into_parts(self) -> (String, IndexMap<String, String>) {
        (self.template, self.parameters)
    }
}

/// Result of one plugin check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value satisfies the constraint.
    Valid,
    /// The value violates the constraint.
    Invalid(Failure),
}

impl Outcome {
    /// Shorthand for an invalid outcome without parameters.
    pub fn invalid(template: impl Into<String>) -> Self {
        Self::Invalid(Failure::new(template))
    }

    /// `Valid` when `ok`, otherwise `Invalid` with `template`.
    pub fn check(ok: bool, template: impl Into<String>) -> Self {
        if ok { Self::Valid } else { Self::invalid(template) }
    }

    /// Returns `true` for [`Outcome::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        Self::Invalid(failure)
    }
}

// ============================================================================
// OPTION SCHEMA
// ============================================================================

/// Options a plugin accepts, checked when metadata is resolved.
///
/// The `message` option is accepted by every plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    required: IndexSet<String>,
    optional: IndexSet<String>,
    open: bool,
}

impl OptionSchema {
    /// Accepts any option; nothing is required.
    #[must_use]
    pub fn open() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    /// Accepts only options declared through [`required`](Self::required)
    /// and [`optional`](Self::optional).
    #[must_use]
    pub fn closed() -> Self {
        Self::default()
    }

    /// Declares a required option.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.insert(name.into());
        self
    }

    /// Declares an optional option.
    #[must_use = "builder methods must be chained or built"]
    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.optional.insert(name.into());
        self
    }

    /// Required options that `constraint` does not declare.
    #[must_use]
    pub fn missing(&self, constraint: &ConstraintSpecification) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| constraint.get(name).is_none())
            .cloned()
            .collect()
    }

    /// Options `constraint` declares that this schema does not accept.
    #[must_use]
    pub fn unknown(&self, constraint: &ConstraintSpecification) -> Vec<String> {
        if self.open {
            return Vec::new();
        }
        constraint
            .options()
            .keys()
            .filter(|name| {
                name.as_str() != crate::spec::MESSAGE_OPTION
                    && !self.required.contains(*name)
                    && !self.optional.contains(*name)
            })
            .cloned()
            .collect()
    }
}

// ============================================================================
// PLUGIN TRAIT
// ============================================================================

/// A constraint implementation, looked up by constraint name.
pub trait ConstraintValidator: Send + Sync {
    /// Options this plugin accepts. Defaults to an open schema.
    fn options(&self) -> OptionSchema {
        OptionSchema::open()
    }

    /// Checks `value` against `constraint`.
    ///
    /// Violations produced through `scope` (nested constraints, cascaded
    /// objects) are recorded directly; the returned outcome describes only
    /// this constraint's own verdict.
    fn validate(
        &self,
        value: &Value,
        constraint: &Arc<ConstraintSpecification>,
        scope: &mut ConstraintScope<'_, '_>,
    ) -> Result<Outcome>;
}

/// Adapts a closure into a [`ConstraintValidator`].
///
/// # Examples
///
/// ```rust,ignore
/// let not_blank = FnValidator::new(|value, _| {
///     Outcome::check(value.as_str().is_some_and(|s| !s.is_empty()), "This value should not be blank.")
/// });
/// ```
pub struct FnValidator<F> {
    check: F,
    schema: OptionSchema,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value, &ConstraintSpecification) -> Outcome + Send + Sync,
{
    /// Wraps `check` with an open option schema.
    pub fn new(check: F) -> Self {
        Self {
            check,
            schema: OptionSchema::open(),
        }
    }

    /// Restricts the accepted options.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_options(mut self, schema: OptionSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl<F> ConstraintValidator for FnValidator<F>
where
    F: Fn(&Value, &ConstraintSpecification) -> Outcome + Send + Sync,
{
    fn options(&self) -> OptionSchema {
        self.schema.clone()
    }

    fn validate(
        &self,
        value: &Value,
        constraint: &Arc<ConstraintSpecification>,
        _scope: &mut ConstraintScope<'_, '_>,
    ) -> Result<Outcome> {
        Ok((self.check)(value, constraint))
    }
}
