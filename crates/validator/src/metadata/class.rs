//! Resolved, hierarchy-merged metadata.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::spec::ConstraintSpecification;
use crate::types::{PropertyAccess, PropertyKind};

/// Merged constraints for one property of a resolved class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMetadata {
    pub(crate) class: String,
    pub(crate) name: String,
    pub(crate) kind: PropertyKind,
    pub(crate) access: Option<PropertyAccess>,
    pub(crate) constraints: Vec<Arc<ConstraintSpecification>>,
    pub(crate) local: Vec<Arc<ConstraintSpecification>>,
}

impl PropertyMetadata {
    /// Class whose metadata this belongs to.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Getter-style if any layer declared it so.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// How the property is read, or `None` if it is not readable.
    #[must_use]
    pub fn access(&self) -> Option<&PropertyAccess> {
        self.access.as_ref()
    }

    /// Constraints merged across the whole hierarchy.
    #[must_use]
    pub fn constraints(&self) -> &[Arc<ConstraintSpecification>] {
        &self.constraints
    }

    /// Constraints declared on the class itself.
    #[must_use]
    pub fn local_constraints(&self) -> &[Arc<ConstraintSpecification>] {
        &self.local
    }
}

/// Metadata for one class: every constraint that applies to it, merged from
/// superclasses, interfaces and its own declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    pub(crate) class: String,
    pub(crate) constraints: Vec<Arc<ConstraintSpecification>>,
    pub(crate) local: Vec<Arc<ConstraintSpecification>>,
    pub(crate) properties: IndexMap<String, PropertyMetadata>,
    pub(crate) group_sequence: Option<Vec<String>>,
}

impl ClassMetadata {
    /// Class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Class-level constraints merged across the whole hierarchy.
    #[must_use]
    pub fn constraints(&self) -> &[Arc<ConstraintSpecification>] {
        &self.constraints
    }

    /// Class-level constraints declared on the class itself.
    #[must_use]
    pub fn local_constraints(&self) -> &[Arc<ConstraintSpecification>] {
        &self.local
    }

    /// Properties carrying constraints anywhere in the hierarchy.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, PropertyMetadata> {
        &self.properties
    }

    /// One property's metadata.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.get(name)
    }

    /// Group sequence declared on the class itself.
    #[must_use]
    pub fn group_sequence(&self) -> Option<&[String]> {
        self.group_sequence.as_deref()
    }
}
