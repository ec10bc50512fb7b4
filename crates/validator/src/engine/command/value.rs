use std::sync::Arc;

use super::{CacheKey, Command, CommandKind, ValidateConstraint};
use crate::engine::context::ExecutionContext;
use crate::error::Result;
use crate::finder::ConstraintFinder;
use crate::group::GroupSet;
use crate::value::Value;
use crate::violation::{ConstraintViolationList, PropertyPath};

/// Validates a value against the constraints of `class.property`.
pub(crate) struct ValidateValue {
    pub(crate) class: String,
    pub(crate) property: String,
    pub(crate) value: Value,
    pub(crate) path: PropertyPath,
    pub(crate) groups: Arc<GroupSet>,
}

impl Command for ValidateValue {
    fn kind(&self) -> CommandKind {
        CommandKind::Value
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::of(
            self.kind(),
            &(
                &self.class,
                &self.property,
                &self.value,
                &self.path,
                self.groups.as_ref(),
            ),
        )
    }

    fn execute(
        self,
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        let metadata = ctx.resolver().resolve(&self.class)?;
        let constraints = ConstraintFinder::new(&metadata)
            .property(&self.property)
            .groups(&self.groups)
            .find();

        for constraint in constraints {
            ctx.run(
                ValidateConstraint {
                    value: self.value.clone(),
                    constraint,
                    path: self.path.clone(),
                    groups: Arc::clone(&self.groups),
                },
                violations,
            )?;
        }
        Ok(())
    }
}
