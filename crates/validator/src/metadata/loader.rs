//! Sources of constraint declarations.

use std::sync::Arc;

use crate::error::Result;
use crate::group::GroupRegistry;
use crate::spec::{ClassBuilder, Specification};

/// Contributes declarations for classes and groups.
///
/// Every registered loader is asked about every class; contributions
/// accumulate in the same [`ClassBuilder`] before hierarchy merging.
pub trait MetadataLoader: Send + Sync {
    /// Adds declarations for `class.class()`. Returns `true` if anything
    /// was contributed.
    fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool>;

    /// Adds group compositions.
    fn load_group_metadata(&self, _groups: &mut GroupRegistry) {}
}

impl MetadataLoader for Specification {
    fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool> {
        match self.class(class.class()) {
            Some(spec) => {
                class.extend_from(spec)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn load_group_metadata(&self, groups: &mut GroupRegistry) {
        for group in self.groups().values() {
            groups.add(group.name(), group.groups().iter().map(String::as_str));
        }
    }
}

impl<L: MetadataLoader + ?Sized> MetadataLoader for Arc<L> {
    fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool> {
        (**self).load_class_metadata(class)
    }

    fn load_group_metadata(&self, groups: &mut GroupRegistry) {
        (**self).load_group_metadata(groups);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ConstraintSpecification;

    #[test]
    fn specification_loads_only_declared_classes() {
        let spec = Specification::builder()
            .class("Author", |c| {
                c.property("firstName", [ConstraintSpecification::new("NotBlank")]);
            })
            .group("Strict", ["Default"])
            .build()
            .unwrap();

        let mut author = ClassBuilder::new("Author");
        assert!(spec.load_class_metadata(&mut author).unwrap());
        let mut book = ClassBuilder::new("Book");
        assert!(!spec.load_class_metadata(&mut book).unwrap());

        let mut groups = GroupRegistry::new();
        spec.load_group_metadata(&mut groups);
        assert!(groups.get("Strict").is_some());
    }
}
