//! Builders producing immutable specifications.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::constraint::ConstraintSpecification;
use super::element::{
    ClassSpecification, ElementSpecification, GroupSpecification, PropertySpecification,
    Specification,
};
use crate::error::{Result, ValidatorError};
use crate::group::DEFAULT_GROUP;
use crate::types::PropertyKind;

/// Collects declarations for one class.
///
/// Metadata loaders receive a `&mut ClassBuilder` and add to it; several
/// loaders contribute to the same builder before [`ClassBuilder::build`]
/// checks the result.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    element: ElementSpecification,
    properties: IndexMap<String, PropertySpecification>,
    group_sequence: Option<Vec<String>>,
}

impl ClassBuilder {
    /// Starts an empty declaration for `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            element: ElementSpecification::new(class),
            properties: IndexMap::new(),
            group_sequence: None,
        }
    }

    /// Class being declared.
    #[must_use]
    pub fn class(&self) -> &str {
        self.element.class()
    }

    /// Adds a class-level constraint.
    pub fn constraint(&mut self, constraint: ConstraintSpecification) -> &mut Self {
        self.element.constraints.push(Arc::new(constraint));
        self
    }

    /// Adds constraints to a member property.
    pub fn property<I>(&mut self, name: impl Into<String>, constraints: I) -> &mut Self
    where
        I: IntoIterator<Item = ConstraintSpecification>,
    {
        self.add_property(name.into(), PropertyKind::Member, constraints);
        self
    }

    /// Adds constraints to a getter-style virtual property.
    pub fn getter<I>(&mut self, name: impl Into<String>, constraints: I) -> &mut Self
    where
        I: IntoIterator<Item = ConstraintSpecification>,
    {
        self.add_property(name.into(), PropertyKind::Getter, constraints);
        self
    }

    /// Sets the explicit group sequence, replacing any earlier one.
    pub fn group_sequence<I, S>(&mut self, groups: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_sequence = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Merges an existing declaration into this builder.
    ///
    /// Constraints are appended; a group sequence may only be contributed
    /// once unless both contributions agree.
    pub fn extend_from(&mut self, spec: &ClassSpecification) -> Result<&mut Self> {
        self.element
            .constraints
            .extend(spec.constraints().iter().cloned());

        for (name, property) in spec.properties() {
            let entry = self.property_entry(name.clone(), property.kind());
            entry
                .element
                .constraints
                .extend(property.constraints().iter().cloned());
        }

        if let Some(sequence) = spec.group_sequence() {
            match &self.group_sequence {
                Some(existing) if existing.as_slice() != sequence => {
                    return Err(ValidatorError::group_sequence(
                        self.class(),
                        format!(
                            "conflicting group sequences [{}] and [{}]",
                            existing.join(", "),
                            sequence.join(", ")
                        ),
                    ));
                }
                _ => self.group_sequence = Some(sequence.to_vec()),
            }
        }
        Ok(self)
    }

    fn add_property<I>(&mut self, name: String, kind: PropertyKind, constraints: I)
    where
        I: IntoIterator<Item = ConstraintSpecification>,
    {
        let entry = self.property_entry(name, kind);
        entry
            .element
            .constraints
            .extend(constraints.into_iter().map(Arc::new));
    }

    fn property_entry(&mut self, name: String, kind: PropertyKind) -> &mut PropertySpecification {
        let class = self.element.class.clone();
        let entry = self
            .properties
            .entry(name.clone())
            .or_insert_with(|| PropertySpecification {
                element: ElementSpecification::new(class),
                name,
                kind,
            });
        if kind == PropertyKind::Getter {
            entry.kind = PropertyKind::Getter;
        }
        entry
    }

    /// Checks the group sequence and freezes the declaration.
    pub fn build(self) -> Result<ClassSpecification> {
        if let Some(sequence) = &self.group_sequence {
            validate_sequence(self.class(), sequence)?;
        }
        Ok(ClassSpecification {
            element: self.element,
            properties: self.properties,
            group_sequence: self.group_sequence,
        })
    }
}

fn validate_sequence(class: &str, sequence: &[String]) -> Result<()> {
    if sequence.is_empty() {
        return Err(ValidatorError::group_sequence(class, "sequence is empty"));
    }
    if sequence.iter().any(|g| g == DEFAULT_GROUP) {
        return Err(ValidatorError::group_sequence(
            class,
            format!("sequence must not contain the {DEFAULT_GROUP} group"),
        ));
    }
    let mut seen = IndexSet::new();
    if let Some(duplicate) = sequence.iter().find(|g| !seen.insert(g.as_str())) {
        return Err(ValidatorError::group_sequence(
            class,
            format!("group {duplicate} appears more than once"),
        ));
    }
    Ok(())
}

// ============================================================================
// SPECIFICATION BUILDER
// ============================================================================

/// Builder for [`Specification`].
///
/// # Examples
///
/// ```rust,ignore
/// let spec = Specification::builder()
///     .class("Author", |c| {
///         c.property("firstName", [ConstraintSpecification::new("NotBlank")])
///             .group_sequence(["Author", "Strict"]);
///     })
///     .group("Registration", ["Default", "Strict"])
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct SpecificationBuilder {
    classes: IndexMap<String, ClassBuilder>,
    groups: IndexMap<String, GroupSpecification>,
}

impl SpecificationBuilder {
    /// Adds declarations for `class`. Repeated calls accumulate.
    #[must_use = "builder methods must be chained or built"]
    pub fn class<F>(mut self, class: impl Into<String>, declare: F) -> Self
    where
        F: FnOnce(&mut ClassBuilder),
    {
        let class = class.into();
        let builder = self
            .classes
            .entry(class.clone())
            .or_insert_with(|| ClassBuilder::new(class));
        declare(builder);
        self
    }

    /// Declares `name` as composed of `subgroups`. Repeated calls accumulate.
    #[must_use = "builder methods must be chained or built"]
    pub fn group<I, S>(mut self, name: impl Into<String>, subgroups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let entry = self
            .groups
            .entry(name.clone())
            .or_insert_with(|| GroupSpecification {
                name,
                groups: Vec::new(),
            });
        for subgroup in subgroups {
            let subgroup = subgroup.into();
            if !entry.groups.contains(&subgroup) {
                entry.groups.push(subgroup);
            }
        }
        self
    }

    /// Freezes the specification, rejecting malformed group sequences.
    pub fn build(self) -> Result<Specification> {
        let classes = self
            .classes
            .into_iter()
            .map(|(name, builder)| Ok((name, Arc::new(builder.build()?))))
            .collect::<Result<_>>()?;
        Ok(Specification {
            classes,
            groups: self.groups,
        })
    }
}
