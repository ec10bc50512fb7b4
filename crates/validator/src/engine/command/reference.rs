use std::sync::Arc;

use indexmap::IndexMap;

use super::{CacheKey, Command, CommandKind, ValidateObject};
use crate::constraints::CLASS_OPTION;
use crate::engine::context::ExecutionContext;
use crate::error::Result;
use crate::group::GroupSet;
use crate::spec::{ConstraintSpecification, OptionValue};
use crate::value::{ObjectRef, Value};
use crate::violation::{ConstraintViolation, ConstraintViolationList, PropertyPath};

const TYPE_MISMATCH: &str = "This value should be an instance of %class%.";

/// Cascades into a referenced object after checking its type.
pub(crate) struct ValidateReference {
    pub(crate) object: ObjectRef,
    pub(crate) constraint: Arc<ConstraintSpecification>,
    pub(crate) path: PropertyPath,
    pub(crate) groups: Arc<GroupSet>,
}

impl Command for ValidateReference {
    fn kind(&self) -> CommandKind {
        CommandKind::Reference
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::of(
            self.kind(),
            &(
                self.object.id(),
                Arc::as_ptr(&self.constraint).addr(),
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
        let expected = self
            .constraint
            .get(CLASS_OPTION)
            .and_then(OptionValue::as_str);

        if let Some(expected) = expected {
            let types = ctx.resolver().types();
            if !types.is_subtype(self.object.class(), expected) {
                let parameters = IndexMap::from([("%class%".to_owned(), expected.to_owned())]);
                violations.push(ConstraintViolation::new(
                    self.constraint.message().unwrap_or(TYPE_MISMATCH),
                    parameters,
                    ctx.root().clone(),
                    &self.path,
                    Value::Object(self.object.clone()),
                    self.constraint.name(),
                ));
                return Ok(());
            }
        }

        ctx.run(
            ValidateObject::new(self.object, self.groups, self.path),
            violations,
        )
    }
}
