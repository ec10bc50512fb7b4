//! The five traversal commands.
//!
//! Each command knows how to execute itself against the context and how to
//! describe its inputs as a [`CacheKey`]. The context skips any command whose
//! key it has already seen during the pass.

mod constraint;
mod object;
mod property;
mod reference;
mod value;

use std::hash::{DefaultHasher, Hash, Hasher};

pub(crate) use constraint::ValidateConstraint;
pub(crate) use object::ValidateObject;
pub(crate) use property::ValidateProperty;
pub(crate) use reference::ValidateReference;
pub(crate) use value::ValidateValue;

use super::context::ExecutionContext;
use crate::error::Result;
use crate::violation::ConstraintViolationList;

/// Discriminates commands whose inputs might hash alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CommandKind {
    Object,
    Property,
    Value,
    Constraint,
    Reference,
}

/// Identity of one unit of work within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    kind: CommandKind,
    hash: u64,
}

impl CacheKey {
    pub(crate) fn of<T: Hash + ?Sized>(kind: CommandKind, inputs: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        inputs.hash(&mut hasher);
        Self {
            kind,
            hash: hasher.finish(),
        }
    }

    pub(crate) fn kind(&self) -> CommandKind {
        self.kind
    }
}

pub(crate) trait Command {
    fn kind(&self) -> CommandKind;

    fn cache_key(&self) -> CacheKey;

    fn execute(
        self,
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()>;
}
