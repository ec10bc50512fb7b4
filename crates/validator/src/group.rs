//! Validation groups and group composition.

use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};

/// Group every constraint belongs to unless declared otherwise.
pub const DEFAULT_GROUP: &str = "Default";

/// An ordered set of active group names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet(IndexSet<String>);

impl GroupSet {
    /// Builds a set from names, keeping first occurrences.
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(groups.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `group` is active.
    #[must_use]
    pub fn contains(&self, group: &str) -> bool {
        self.0.contains(group)
    }

    /// Number of active groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no group is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Copy of the set without the given groups.
    #[must_use]
    pub fn without(&self, excluded: &[&str]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|g| !excluded.contains(&g.as_str()))
                .cloned()
                .collect(),
        )
    }
}

// Equality ignores order, so hashing must too.
impl Hash for GroupSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut groups: Vec<&str> = self.iter().collect();
        groups.sort_unstable();
        groups.hash(state);
    }
}

impl<S: Into<String>> FromIterator<S> for GroupSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ============================================================================
// GROUP REGISTRY
// ============================================================================

/// Named group compositions collected from metadata loaders.
///
/// Declaring the same group twice appends to its constituents.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: IndexMap<String, IndexSet<String>>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` as composed of `subgroups`.
    pub fn add<I, S>(&mut self, name: impl Into<String>, subgroups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .entry(name.into())
            .or_default()
            .extend(subgroups.into_iter().map(Into::into));
    }

    /// Constituents of a composite group, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IndexSet<String>> {
        self.groups.get(name)
    }

    /// Number of declared composite groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no composite group is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Expands requested groups through their compositions.
    ///
    /// The result holds every requested group followed by its constituents,
    /// depth-first. Composition cycles are tolerated.
    pub fn expand<'g, I>(&self, requested: I) -> GroupSet
    where
        I: IntoIterator<Item = &'g str>,
    {
        let mut expanded = IndexSet::new();
        for group in requested {
            self.expand_into(group, &mut expanded);
        }
        GroupSet(expanded)
    }

    fn expand_into(&self, group: &str, expanded: &mut IndexSet<String>) {
        if !expanded.insert(group.to_owned()) {
            return;
        }
        if let Some(subgroups) = self.groups.get(group) {
            for subgroup in subgroups {
                self.expand_into(subgroup, expanded);
            }
        }
    }
}
