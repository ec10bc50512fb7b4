use std::sync::Arc;

use super::CONSTRAINTS_OPTION;
use super::all::NOT_TRAVERSABLE;
use crate::engine::ConstraintScope;
use crate::error::Result;
use crate::plugin::{ConstraintValidator, OptionSchema, Outcome};
use crate::spec::ConstraintSpecification;
use crate::value::Value;
use crate::violation::PropertyPath;

const EMPTY_COLLECTION: &str = "This collection should contain at least one valid element.";

/// Passes when at least one element satisfies every nested constraint.
///
/// Elements are tried in order and the first fully valid one ends the check.
/// If none is valid, the violations of every element are reported. Each
/// element is tried in isolation, so objects also reachable elsewhere in the
/// graph are judged on their own violations. An empty collection yields a
/// single violation of its own; null passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl ConstraintValidator for Any {
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
        let elements: Vec<(PropertyPath, &Value)> = match value {
            Value::Null => return Ok(Outcome::Valid),
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (path.index(index), item))
                .collect(),
            Value::Map(entries) => entries
                .iter()
                .map(|(key, item)| (path.key(key), item))
                .collect(),
            _ => return Ok(Outcome::invalid(NOT_TRAVERSABLE)),
        };

        if elements.is_empty() {
            return Ok(Outcome::invalid(EMPTY_COLLECTION));
        }

        let mut rejected = Vec::with_capacity(elements.len());
        for (element_path, item) in elements {
            let attempt = scope.trial(|trial| {
                for inner in nested {
                    trial.validate_constraint(item, inner, element_path.clone())?;
                }
                Ok(())
            })?;
            if attempt.is_valid() {
                scope.commit(attempt);
                return Ok(Outcome::Valid);
            }
            rejected.push(attempt);
        }

        for attempt in rejected {
            scope.commit(attempt);
        }
        Ok(Outcome::Valid)
    }
}
