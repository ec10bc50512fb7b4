use std::sync::Arc;

use super::{CacheKey, Command, CommandKind};
use crate::engine::context::ExecutionContext;
use crate::engine::scope::ConstraintScope;
use crate::error::{Result, ValidatorError};
use crate::group::GroupSet;
use crate::plugin::Outcome;
use crate::spec::ConstraintSpecification;
use crate::value::Value;
use crate::violation::{ConstraintViolation, ConstraintViolationList, PropertyPath};

/// Runs one plugin against one value.
pub(crate) struct ValidateConstraint {
    pub(crate) value: Value,
    pub(crate) constraint: Arc<ConstraintSpecification>,
    pub(crate) path: PropertyPath,
    pub(crate) groups: Arc<GroupSet>,
}

impl Command for ValidateConstraint {
    fn kind(&self) -> CommandKind {
        CommandKind::Constraint
    }

    // Groups are left out: a constraint checked once in a pass is not
    // checked again when a later group selects it too.
    fn cache_key(&self) -> CacheKey {
        CacheKey::of(
            self.kind(),
            &(
                &self.value,
                Arc::as_ptr(&self.constraint).addr(),
                &self.path,
            ),
        )
    }

    fn execute(
        self,
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        let name = self.constraint.name();
        let plugin = ctx
            .resolver()
            .plugins()
            .get(name)
            .cloned()
            .ok_or_else(|| ValidatorError::unknown_constraint(name))?;

        let outcome = {
            let mut scope = ConstraintScope::new(ctx, violations, &self.path, &self.groups);
            plugin.validate(&self.value, &self.constraint, &mut scope)?
        };

        if let Outcome::Invalid(failure) = outcome {
            violations.push(ConstraintViolation::from_failure(
                failure,
                self.constraint.message(),
                ctx.root().clone(),
                &self.path,
                self.value.clone(),
                name,
            ));
        }
        Ok(())
    }
}
