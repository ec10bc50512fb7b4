//! The execution engine and its public facade.
//!
//! [`Validator`] owns the resolver and plugin registry and turns each
//! top-level call into a depth-first pass over the object graph. A pass is
//! single-threaded and owns its own context; a `Validator` can serve many
//! passes concurrently.

mod command;
mod context;
mod scope;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use scope::{Attempt, ConstraintScope};

use self::command::{ValidateObject, ValidateProperty, ValidateValue};
use self::context::ExecutionContext;
use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::finder::{ConstraintFinder, Scope};
use crate::group::{DEFAULT_GROUP, GroupSet};
use crate::metadata::{ClassMetadata, MetadataLoader, MetadataResolver};
use crate::plugin::{ConstraintRegistry, ConstraintValidator};
use crate::spec::{ConstraintSpecification, Specification};
use crate::types::TypeRegistry;
use crate::value::{ObjectRef, Value};
use crate::violation::{ConstraintViolationList, PropertyPath};

/// Validates object graphs against resolved constraint metadata.
///
/// # Examples
///
/// ```rust,ignore
/// let validator = Validator::builder()
///     .types(types)
///     .specification(spec)
///     .constraint("NotBlank", FnValidator::new(not_blank))
///     .build();
///
/// let violations = validator.validate_object(&author, &[])?;
/// for violation in &violations {
///     println!("{violation}");
/// }
/// ```
pub struct Validator {
    resolver: MetadataResolver,
}

impl Validator {
    /// Starts configuring a validator.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Validates `object` and everything it cascades into.
    ///
    /// An empty `groups` slice means `Default`.
    pub fn validate_object(
        &self,
        object: &ObjectRef,
        groups: &[&str],
    ) -> Result<ConstraintViolationList> {
        let groups = Arc::new(self.expand(groups));
        debug!(class = object.class(), groups = ?groups, "validating object");

        let mut violations = ConstraintViolationList::new();
        let mut ctx = ExecutionContext::new(Value::Object(object.clone()), &self.resolver);
        ctx.run(
            ValidateObject::new(object.clone(), groups, PropertyPath::root()),
            &mut violations,
        )?;

        debug!(violations = violations.len(), "object validated");
        Ok(violations)
    }

    /// Validates one property of `object`, cascading as declared.
    ///
    /// Group sequences are not applied. Fails with `Access` if the property
    /// cannot be read.
    pub fn validate_property(
        &self,
        object: &ObjectRef,
        property: &str,
        groups: &[&str],
    ) -> Result<ConstraintViolationList> {
        let groups = Arc::new(self.expand(groups));
        debug!(class = object.class(), property, groups = ?groups, "validating property");

        let mut violations = ConstraintViolationList::new();
        let mut ctx = ExecutionContext::new(Value::Object(object.clone()), &self.resolver);
        ctx.run(
            ValidateProperty {
                object: object.clone(),
                property: property.to_owned(),
                groups,
                path: PropertyPath::root(),
            },
            &mut violations,
        )?;

        debug!(violations = violations.len(), "property validated");
        Ok(violations)
    }

    /// Validates a candidate `value` for `class.property` without an object.
    pub fn validate_value(
        &self,
        class: &str,
        property: &str,
        value: impl Into<Value>,
        groups: &[&str],
    ) -> Result<ConstraintViolationList> {
        let value = value.into();
        let groups = Arc::new(self.expand(groups));
        debug!(class, property, groups = ?groups, "validating value");

        let mut violations = ConstraintViolationList::new();
        let mut ctx = ExecutionContext::new(value.clone(), &self.resolver);
        ctx.run(
            ValidateValue {
                class: class.to_owned(),
                property: property.to_owned(),
                value,
                path: PropertyPath::root().property(property),
                groups,
            },
            &mut violations,
        )?;

        debug!(violations = violations.len(), "value validated");
        Ok(violations)
    }

    /// Resolved metadata for `class`.
    pub fn metadata_for(&self, class: &str) -> Result<Arc<ClassMetadata>> {
        self.resolver.resolve(class)
    }

    /// Constraints of `class` (or one of its properties) by scope and groups.
    ///
    /// `None` for `groups` disables group filtering; named groups are
    /// expanded through their compositions first.
    pub fn find_constraints(
        &self,
        class: &str,
        property: Option<&str>,
        scope: Scope,
        groups: Option<&[&str]>,
    ) -> Result<Vec<Arc<ConstraintSpecification>>> {
        let metadata = self.resolver.resolve(class)?;
        let groups = groups.map(|groups| self.resolver.groups().expand(groups.iter().copied()));

        let mut finder = ConstraintFinder::new(&metadata).scope(scope);
        if let Some(property) = property {
            finder = finder.property(property);
        }
        if let Some(groups) = &groups {
            finder = finder.groups(groups);
        }
        Ok(finder.find())
    }

    /// The underlying metadata resolver.
    #[must_use]
    pub fn resolver(&self) -> &MetadataResolver {
        &self.resolver
    }

    fn expand(&self, groups: &[&str]) -> GroupSet {
        if groups.is_empty() {
            self.resolver.groups().expand([DEFAULT_GROUP])
        } else {
            self.resolver.groups().expand(groups.iter().copied())
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("resolver", &self.resolver)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
#[derive(Default)]
pub struct ValidatorBuilder {
    types: Option<Arc<TypeRegistry>>,
    loaders: Vec<Arc<dyn MetadataLoader>>,
    plugins: ConstraintRegistry,
    config: ValidatorConfig,
}

impl ValidatorBuilder {
    /// Sets the type registry describing every validated class.
    #[must_use = "builder methods must be chained or built"]
    pub fn types(mut self, types: impl Into<Arc<TypeRegistry>>) -> Self {
        self.types = Some(types.into());
        self
    }

    /// Adds a built specification as a metadata loader.
    #[must_use = "builder methods must be chained or built"]
    pub fn specification(self, specification: Specification) -> Self {
        self.loader(specification)
    }

    /// Adds a metadata loader. Loaders contribute in registration order.
    #[must_use = "builder methods must be chained or built"]
    pub fn loader(mut self, loader: impl MetadataLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }

    /// Registers a plugin for the constraint `name`.
    #[must_use = "builder methods must be chained or built"]
    pub fn constraint(
        mut self,
        name: impl Into<String>,
        validator: impl ConstraintValidator + 'static,
    ) -> Self {
        self.plugins.register(name, validator);
        self
    }

    /// Replaces the whole plugin registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn plugins(mut self, plugins: ConstraintRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    /// Sets the engine configuration.
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Finishes the validator. Without a type registry every class is
    /// unknown.
    pub fn build(self) -> Validator {
        let resolver = MetadataResolver::new(
            self.types.unwrap_or_default(),
            self.loaders,
            Arc::new(self.plugins),
            self.config,
        );
        Validator { resolver }
    }
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBuilder")
            .field("types", &self.types)
            .field("loaders", &self.loaders.len())
            .field("plugins", &self.plugins)
            .field("config", &self.config)
            .finish()
    }
}
