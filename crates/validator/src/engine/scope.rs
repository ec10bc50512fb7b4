//! The handle plugins use to recurse into the engine.

use std::sync::Arc;

use super::command::{ValidateConstraint, ValidateReference};
use super::context::{ExecutionContext, PassState};
use crate::error::Result;
use crate::group::GroupSet;
use crate::spec::ConstraintSpecification;
use crate::value::{ObjectRef, Value};
use crate::violation::{ConstraintViolationList, PropertyPath};

/// Where a plugin is running: path, active groups, and the violation sink.
///
/// Everything issued through the scope goes through the same seen-set as
/// the rest of the pass.
pub struct ConstraintScope<'c, 'a> {
    ctx: &'c mut ExecutionContext<'a>,
    violations: &'c mut ConstraintViolationList,
    path: &'c PropertyPath,
    groups: &'c Arc<GroupSet>,
}

impl<'c, 'a> ConstraintScope<'c, 'a> {
    pub(crate) fn new(
        ctx: &'c mut ExecutionContext<'a>,
        violations: &'c mut ConstraintViolationList,
        path: &'c PropertyPath,
        groups: &'c Arc<GroupSet>,
    ) -> Self {
        Self {
            ctx,
            violations,
            path,
            groups,
        }
    }

    /// Path of the value being validated.
    #[must_use]
    pub fn path(&self) -> &PropertyPath {
        self.path
    }

    /// Active groups.
    #[must_use]
    pub fn groups(&self) -> &GroupSet {
        self.groups
    }

    /// The value the top-level call started from.
    #[must_use]
    pub fn root(&self) -> &Value {
        self.ctx.root()
    }

    /// Validates `value` against a nested constraint at `path`.
    pub fn validate_constraint(
        &mut self,
        value: &Value,
        constraint: &Arc<ConstraintSpecification>,
        path: PropertyPath,
    ) -> Result<()> {
        let command = ValidateConstraint {
            value: value.clone(),
            constraint: Arc::clone(constraint),
            path,
            groups: Arc::clone(self.groups),
        };
        self.ctx.run(command, self.violations)
    }

    /// Cascades into `object` on behalf of `constraint`, rooted at `path`.
    pub fn validate_reference(
        &mut self,
        object: &ObjectRef,
        constraint: &Arc<ConstraintSpecification>,
        path: PropertyPath,
    ) -> Result<()> {
        let command = ValidateReference {
            object: object.clone(),
            constraint: Arc::clone(constraint),
            path,
            groups: Arc::clone(self.groups),
        };
        self.ctx.run(command, self.violations)
    }

    /// Runs `attempt` in isolation and returns what it found.
    ///
    /// The attempt starts without knowledge of work already done in this
    /// pass, so shared objects are validated again inside it. Neither its
    /// violations nor its work count until passed to
    /// [`commit`](Self::commit); a discarded attempt leaves the pass as it
    /// was.
    pub fn trial<F>(&mut self, attempt: F) -> Result<Attempt>
    where
        F: FnOnce(&mut ConstraintScope<'_, 'a>) -> Result<()>,
    {
        let outer = self.ctx.fork();
        let mut scratch = ConstraintViolationList::new();
        let mut scope = ConstraintScope {
            ctx: &mut *self.ctx,
            violations: &mut scratch,
            path: self.path,
            groups: self.groups,
        };
        let outcome = attempt(&mut scope);
        let state = self.ctx.restore(outer);
        outcome?;
        Ok(Attempt {
            violations: scratch,
            state,
        })
    }

    /// Records an attempt from [`trial`](Self::trial): its violations join
    /// the pass and the objects it walked count as validated.
    pub fn commit(&mut self, attempt: Attempt) {
        self.ctx.absorb(attempt.state);
        self.violations.extend(attempt.violations);
    }
}

/// Result of [`ConstraintScope::trial`].
#[derive(Debug)]
pub struct Attempt {
    violations: ConstraintViolationList,
    state: PassState,
}

impl Attempt {
    /// Returns `true` if the attempt found no violation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations found by the attempt.
    #[must_use]
    pub fn violations(&self) -> &ConstraintViolationList {
        &self.violations
    }
}
