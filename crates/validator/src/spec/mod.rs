//! The declared form of constraints, before hierarchy merging.
//!
//! A [`Specification`] is what metadata loaders produce: per class, the
//! constraints declared directly on it and its properties, an optional group
//! sequence, and named group compositions. It is immutable once built and
//! can be shared freely.

mod builder;
mod constraint;
mod element;

pub use builder::{ClassBuilder, SpecificationBuilder};
pub use constraint::{ConstraintSpecification, MESSAGE_OPTION, OptionValue};
pub use element::{
    ClassSpecification, ElementSpecification, GroupSpecification, PropertySpecification,
    Specification,
};
