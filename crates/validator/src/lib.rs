//! # vigil-validator
//!
//! Declarative validation of object graphs.
//!
//! Constraints are declared per class and property (a [`Specification`] or
//! any other [`MetadataLoader`]), merged across superclasses and interfaces
//! into [`ClassMetadata`], and applied by walking an object graph. Each
//! failed constraint becomes a [`ConstraintViolation`] carrying its message,
//! property path and invalid value.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vigil_validator::prelude::*;
//!
//! let types = TypeRegistry::builder()
//!     .register(TypeDescriptor::class("Author").field("firstName"))
//!     .build()?;
//!
//! let spec = Specification::builder()
//!     .class("Author", |c| {
//!         c.property("firstName", [ConstraintSpecification::new("NotBlank")]);
//!     })
//!     .build()?;
//!
//! let validator = Validator::builder()
//!     .types(types)
//!     .specification(spec)
//!     .constraint("NotBlank", FnValidator::new(|value: &Value, _: &ConstraintSpecification| {
//!         Outcome::check(value.as_str().is_some_and(|s| !s.is_empty()), "This value should not be blank.")
//!     }))
//!     .build();
//!
//! let author = ObjectRef::new("Author").with_field("firstName", "");
//! let violations = validator.validate_object(&author, &[])?;
//! assert_eq!(violations[0].property_path, "firstName");
//! ```
//!
//! ## Groups
//!
//! Every constraint belongs to one or more groups (`Default` unless declared
//! otherwise). A call selects constraints by group; an empty group list means
//! `Default`. Composite groups expand to their constituents, and a class may
//! declare a group sequence that replaces `Default` with ordered steps which
//! stop at the first failing one.
//!
//! ## Structural Constraints
//!
//! - [`Valid`](constraints::Valid): cascade into referenced objects
//! - [`All`](constraints::All): every element satisfies nested constraints
//! - [`Any`](constraints::Any): at least one element does

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod finder;
pub mod group;
pub mod metadata;
pub mod plugin;
pub mod prelude;
pub mod spec;
pub mod types;
pub mod value;
pub mod violation;

pub use config::ValidatorConfig;
pub use engine::{Attempt, ConstraintScope, Validator, ValidatorBuilder};
pub use error::{ErrorKind, Result, ValidatorError};
pub use finder::{ConstraintFinder, Scope};
pub use group::{DEFAULT_GROUP, GroupRegistry, GroupSet};
pub use metadata::{ClassMetadata, MetadataLoader, MetadataResolver, PropertyMetadata};
pub use plugin::{ConstraintRegistry, ConstraintValidator, Failure, FnValidator, OptionSchema, Outcome};
pub use spec::{
    ClassBuilder, ClassSpecification, ConstraintSpecification, GroupSpecification, OptionValue,
    PropertySpecification, Specification, SpecificationBuilder,
};
pub use types::{PropertyAccess, PropertyKind, TypeDescriptor, TypeRegistry};
pub use value::{ObjectId, ObjectRef, Value};
pub use violation::{ConstraintViolation, ConstraintViolationList, PropertyPath};
