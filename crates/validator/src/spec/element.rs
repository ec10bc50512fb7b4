//! Immutable declarations of classes, properties, and groups.

use std::sync::Arc;

use indexmap::IndexMap;

use super::builder::SpecificationBuilder;
use super::constraint::ConstraintSpecification;
use crate::types::PropertyKind;

/// Constraints declared on one element (a class or one of its properties).
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpecification {
    pub(crate) class: String,
    pub(crate) constraints: Vec<Arc<ConstraintSpecification>>,
}

impl ElementSpecification {
    pub(crate) fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            constraints: Vec::new(),
        }
    }

    /// Owning class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Declared constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Arc<ConstraintSpecification>] {
        &self.constraints
    }
}

/// Constraints declared on a single property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpecification {
    pub(crate) element: ElementSpecification,
    pub(crate) name: String,
    pub(crate) kind: PropertyKind,
}

impl PropertySpecification {
    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member or getter-style declaration.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Owning class name.
    #[must_use]
    pub fn class(&self) -> &str {
        self.element.class()
    }

    /// Declared constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Arc<ConstraintSpecification>] {
        self.element.constraints()
    }
}

/// Everything declared directly on one class or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSpecification {
    pub(crate) element: ElementSpecification,
    pub(crate) properties: IndexMap<String, PropertySpecification>,
    pub(crate) group_sequence: Option<Vec<String>>,
}

impl ClassSpecification {
    /// Class name.
    #[must_use]
    pub fn class(&self) -> &str {
        self.element.class()
    }

    /// Class-level constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Arc<ConstraintSpecification>] {
        self.element.constraints()
    }

    /// Property declarations keyed by property name.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, PropertySpecification> {
        &self.properties
    }

    /// One property declaration.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySpecification> {
        self.properties.get(name)
    }

    /// Explicit group sequence, if declared.
    #[must_use]
    pub fn group_sequence(&self) -> Option<&[String]> {
        self.group_sequence.as_deref()
    }

    /// Returns `true` if nothing at all is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element.constraints.is_empty()
            && self.properties.is_empty()
            && self.group_sequence.is_none()
    }
}

/// A named composition of other groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpecification {
    pub(crate) name: String,
    pub(crate) groups: Vec<String>,
}

impl GroupSpecification {
    /// Composite group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constituent groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// Root of a declared constraint set, shareable across validations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    pub(crate) classes: IndexMap<String, Arc<ClassSpecification>>,
    pub(crate) groups: IndexMap<String, GroupSpecification>,
}

impl Specification {
    /// Starts building a specification.
    pub fn builder() -> SpecificationBuilder {
        SpecificationBuilder::default()
    }

    /// Declaration for one class, if any.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Arc<ClassSpecification>> {
        self.classes.get(name)
    }

    /// All class declarations keyed by class name.
    #[must_use]
    pub fn classes(&self) -> &IndexMap<String, Arc<ClassSpecification>> {
        &self.classes
    }

    /// All group compositions keyed by group name.
    #[must_use]
    pub fn groups(&self) -> &IndexMap<String, GroupSpecification> {
        &self.groups
    }
}
