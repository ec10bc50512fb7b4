//! Fixtures shared by the integration suites.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vigil_validator::prelude::*;

pub const NOT_BLANK: &str = "This value should not be blank.";

/// Fails on null, non-strings and empty strings.
pub fn not_blank() -> impl ConstraintValidator {
    FnValidator::new(|value: &Value, _: &ConstraintSpecification| {
        Outcome::check(value.as_str().is_some_and(|s| !s.is_empty()), NOT_BLANK)
    })
}

/// Passes only the string `"VALID"`.
pub fn only_valid() -> impl ConstraintValidator {
    FnValidator::new(|value: &Value, _: &ConstraintSpecification| {
        if value.as_str() == Some("VALID") {
            Outcome::Valid
        } else {
            Failure::new("%value% is not VALID")
                .with_parameter("%value%", value)
                .into()
        }
    })
}

/// Shared invocation counter.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counts invocations and returns a fixed verdict.
pub struct Counting {
    counter: Counter,
    pass: bool,
}

impl Counting {
    pub fn passing(counter: &Counter) -> Self {
        Self {
            counter: counter.clone(),
            pass: true,
        }
    }

    pub fn failing(counter: &Counter) -> Self {
        Self {
            counter: counter.clone(),
            pass: false,
        }
    }
}

impl ConstraintValidator for Counting {
    fn validate(
        &self,
        _value: &Value,
        _constraint: &Arc<ConstraintSpecification>,
        _scope: &mut ConstraintScope<'_, '_>,
    ) -> Result<Outcome> {
        self.counter.0.fetch_add(1, Ordering::SeqCst);
        Ok(Outcome::check(self.pass, "counted"))
    }
}

pub fn registry(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> TypeRegistry {
    descriptors
        .into_iter()
        .fold(TypeRegistry::builder(), |builder, descriptor| {
            builder.register(descriptor)
        })
        .build()
        .expect("fixture types are consistent")
}

pub fn constraint(name: &str) -> ConstraintSpecification {
    ConstraintSpecification::new(name)
}

pub fn names(constraints: &[Arc<ConstraintSpecification>]) -> Vec<&str> {
    constraints.iter().map(|c| c.name()).collect()
}
