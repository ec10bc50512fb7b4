//! Structural constraints built into every [`ConstraintRegistry`].
//!
//! These are the constraints the traversal itself relies on: cascading into
//! referenced objects and applying nested constraints to collection elements.
//! Leaf constraints (not-blank, length, ...) are registered by the caller.
//!
//! [`ConstraintRegistry`]: crate::plugin::ConstraintRegistry

mod all;
mod any;
mod valid;

pub use all::All;
pub use any::Any;
pub use valid::Valid;

/// Name of the cascading constraint.
pub const VALID: &str = "Valid";
/// Name of the every-element constraint.
pub const ALL: &str = "All";
/// Name of the at-least-one-element constraint.
pub const ANY: &str = "Any";

/// Option holding the nested constraints of `All` and `Any`.
pub const CONSTRAINTS_OPTION: &str = "constraints";
/// Option holding the class or interface `Valid` expects.
pub const CLASS_OPTION: &str = "class";
