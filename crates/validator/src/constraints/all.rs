use std::sync::Arc;

use super::CONSTRAINTS_OPTION;
use crate::engine::ConstraintScope;
use crate::error::Result;
use crate::plugin::{ConstraintValidator, OptionSchema, Outcome};
use crate::spec::ConstraintSpecification;
use crate::value::Value;

pub(super) const NOT_TRAVERSABLE: &str = "This value should be traversable.";

/// Applies the nested `constraints` to every element of a list or map.
///
/// Each element failing a nested constraint yields its own violation at the
/// element's path. Null passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct All;

impl ConstraintValidator for All {
    fn options(&self) -> OptionSchema {
        OptionSchema::closed().required(CONSTRAINTS_OPTION)
    }

    fn validate(
        &self,
        value: &Value,
        constraint: &Arc<ConstraintSpecification>,
        scope: &mut ConstraintScope<'_, '_>,
    ) -> Result<Outcome> {
        let nested = constraint.nested(CONSTRAINTS_OPTION);
        let path = scope.path().clone();
        match value {
            Value::Null => {}
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    for inner in nested {
                        scope.validate_constraint(item, inner, path.index(index))?;
                    }
                }
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    for inner in nested {
                        scope.validate_constraint(item, inner, path.key(key))?;
                    }
                }
            }
            _ => return Ok(Outcome::invalid(NOT_TRAVERSABLE)),
        }
        Ok(Outcome::Valid)
    }
}
