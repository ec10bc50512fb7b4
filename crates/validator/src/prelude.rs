//! Prelude module for convenient imports.
//!
//! `use vigil_validator::prelude::*;` brings in everything needed to describe
//! types, declare constraints, register plugins and run validations.

// ============================================================================
// DECLARATIONS: types and constraint specifications
// ============================================================================

pub use crate::spec::{ClassBuilder, ConstraintSpecification, OptionValue, Specification};
pub use crate::types::{PropertyKind, TypeDescriptor, TypeRegistry};
pub use crate::value::{ObjectRef, Value};

// ============================================================================
// PLUGINS
// ============================================================================

pub use crate::engine::{Attempt, ConstraintScope};
pub use crate::plugin::{ConstraintRegistry, ConstraintValidator, Failure, FnValidator, OptionSchema, Outcome};

// ============================================================================
// ENGINE: validation entry points and results
// ============================================================================

pub use crate::config::ValidatorConfig;
pub use crate::engine::Validator;
pub use crate::error::{Result, ValidatorError};
pub use crate::finder::Scope;
pub use crate::metadata::MetadataLoader;
pub use crate::violation::{ConstraintViolation, ConstraintViolationList};
