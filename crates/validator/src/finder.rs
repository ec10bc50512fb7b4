//! Constraint lookup by scope, property, and group.

use std::sync::Arc;

use crate::group::GroupSet;
use crate::metadata::ClassMetadata;
use crate::spec::ConstraintSpecification;

/// Which declarations a lookup considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Scope {
    /// Everything merged from the hierarchy.
    #[default]
    All,
    /// Only what the class itself declares.
    Local,
}

/// Query over one class's resolved metadata.
///
/// Results keep merge order; filters only remove entries.
///
/// # Examples
///
/// ```rust,ignore
/// let strict = ConstraintFinder::new(&metadata)
///     .property("email")
///     .groups(&GroupSet::new(["Strict"]))
///     .find();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConstraintFinder<'a> {
    metadata: &'a ClassMetadata,
    scope: Scope,
    property: Option<&'a str>,
    groups: Option<&'a GroupSet>,
}

impl<'a> ConstraintFinder<'a> {
    /// Starts a query returning every class-level constraint.
    #[must_use]
    pub fn new(metadata: &'a ClassMetadata) -> Self {
        Self {
            metadata,
            scope: Scope::All,
            property: None,
            groups: None,
        }
    }

    /// Restricts the declaration scope.
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Queries one property instead of the class itself.
    #[must_use]
    pub fn property(mut self, property: &'a str) -> Self {
        self.property = Some(property);
        self
    }

    /// Keeps constraints sharing at least one group with `groups`.
    #[must_use]
    pub fn groups(mut self, groups: &'a GroupSet) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Runs the query. An unknown property yields nothing.
    #[must_use]
    pub fn find(&self) -> Vec<Arc<ConstraintSpecification>> {
        let candidates = match self.property {
            Some(name) => match self.metadata.property(name) {
                Some(property) => match self.scope {
                    Scope::All => property.constraints(),
                    Scope::Local => property.local_constraints(),
                },
                None => return Vec::new(),
            },
            None => match self.scope {
                Scope::All => self.metadata.constraints(),
                Scope::Local => self.metadata.local_constraints(),
            },
        };

        candidates
            .iter()
            .filter(|constraint| self.groups.is_none_or(|groups| constraint.in_any(groups)))
            .cloned()
            .collect()
    }

    /// Returns `true` if the query matches anything.
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.find().is_empty()
    }
}
