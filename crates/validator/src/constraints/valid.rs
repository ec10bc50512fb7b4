use std::sync::Arc;

use super::CLASS_OPTION;
use crate::engine::ConstraintScope;
use crate::error::Result;
use crate::plugin::{ConstraintValidator, OptionSchema, Outcome};
use crate::spec::ConstraintSpecification;
use crate::value::Value;
use crate::violation::PropertyPath;

/// Cascades validation into referenced objects.
///
/// Objects are validated with the active groups at the current path. Lists
/// and maps are walked element by element; scalars and null are ignored.
/// With a `class` option, an object that is not an instance of that class or
/// interface produces a type-mismatch violation instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Valid;

impl Valid {
    fn cascade(
        value: &Value,
        constraint: &Arc<ConstraintSpecification>,
        path: PropertyPath,
        scope: &mut ConstraintScope<'_, '_>,
    ) -> Result<()> {
        match value {
            Value::Object(object) => scope.validate_reference(object, constraint, path),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    Self::cascade(item, constraint, path.index(index), scope)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    Self::cascade(item, constraint, path.key(key), scope)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl ConstraintValidator for Valid {
    fn options(&self) -> OptionSchema {
        OptionSchema::closed().optional(CLASS_OPTION)
    }

    fn validate(
        &self,
        value: &Value,
        constraint: &Arc<ConstraintSpecification>,
        scope: &mut ConstraintScope<'_, '_>,
    ) -> Result<Outcome> {
        let path = scope.path().clone();
        Self::cascade(value, constraint, path, scope)?;
        Ok(Outcome::Valid)
    }
}
