use std::sync::Arc;

use super::{CacheKey, Command, CommandKind, ValidateValue};
use crate::engine::context::ExecutionContext;
use crate::error::{Result, ValidatorError};
use crate::group::GroupSet;
use crate::types::PropertyKind;
use crate::value::ObjectRef;
use crate::violation::{ConstraintViolationList, PropertyPath};

/// Reads one property and validates its value.
pub(crate) struct ValidateProperty {
    pub(crate) object: ObjectRef,
    pub(crate) property: String,
    pub(crate) groups: Arc<GroupSet>,
    /// Path of the owning object; the property name is appended on execution.
    pub(crate) path: PropertyPath,
}

impl Command for ValidateProperty {
    fn kind(&self) -> CommandKind {
        CommandKind::Property
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::of(
            self.kind(),
            &(
                self.object.id(),
                &self.property,
                self.groups.as_ref(),
                &self.path,
            ),
        )
    }

    fn execute(
        self,
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        let class = self.object.class();
        let resolver = ctx.resolver();
        let metadata = resolver.resolve(class)?;

        let Some(property) = metadata.property(&self.property) else {
            // Nothing is declared, but the property must still exist.
            return match resolver
                .types()
                .resolve_access(class, &self.property, PropertyKind::Member)?
            {
                Some(_) => Ok(()),
                None => Err(ValidatorError::access(class, &self.property)),
            };
        };

        let access = property
            .access()
            .ok_or_else(|| ValidatorError::access(class, &self.property))?;
        let value = resolver.types().read(&self.object, access)?;

        ctx.run(
            ValidateValue {
                class: class.to_owned(),
                property: self.property.clone(),
                value,
                path: self.path.property(&self.property),
                groups: Arc::clone(&self.groups),
            },
            violations,
        )
    }
}
