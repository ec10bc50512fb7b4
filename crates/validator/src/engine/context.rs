//! Per-call traversal state.

use std::collections::HashSet;

use tracing::trace;

use super::command::{CacheKey, Command};
use crate::error::{Result, ValidatorError};
use crate::metadata::MetadataResolver;
use crate::value::{ObjectId, ObjectRef, Value};
use crate::violation::ConstraintViolationList;

/// One unit of per-object work: a single group, or the class's group
/// sequence as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Pass {
    Group(String),
    Sequence,
}

/// What has already run during a pass.
///
/// `seen` holds command keys; `validated` records which groups each object
/// was walked for, independent of the path it was reached through.
#[derive(Debug, Clone, Default)]
pub(crate) struct PassState {
    seen: HashSet<CacheKey>,
    validated: HashSet<(ObjectId, Pass)>,
}

impl PassState {
    fn merge(&mut self, other: Self) {
        self.seen.extend(other.seen);
        self.validated.extend(other.validated);
    }
}

/// State of one top-level validation call.
///
/// Never shared between calls. The seen-set guarantees each command runs at
/// most once per pass, which is what terminates cyclic graphs.
pub(crate) struct ExecutionContext<'a> {
    root: Value,
    resolver: &'a MetadataResolver,
    state: PassState,
    // Objects currently being walked, innermost last.
    active: Vec<(ObjectId, Pass)>,
    // Visited objects stay alive until the pass ends so their addresses,
    // and therefore their identities, cannot be reused.
    visited: Vec<ObjectRef>,
    depth: usize,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(root: Value, resolver: &'a MetadataResolver) -> Self {
        Self {
            root,
            resolver,
            state: PassState::default(),
            active: Vec::new(),
            visited: Vec::new(),
            depth: 0,
        }
    }

    pub(crate) fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn resolver(&self) -> &'a MetadataResolver {
        self.resolver
    }

    /// Executes `command` unless an identical one already ran in this pass.
    pub(crate) fn run<C: Command>(
        &mut self,
        command: C,
        violations: &mut ConstraintViolationList,
    ) -> Result<()> {
        let key = command.cache_key();
        if !self.state.seen.insert(key) {
            trace!(kind = ?key.kind(), "skipping already executed command");
            return Ok(());
        }
        trace!(kind = ?key.kind(), depth = self.depth, "executing command");
        command.execute(violations, self)
    }

    /// Returns `true` if `object` was already walked for `pass`.
    pub(crate) fn is_validated(&self, object: ObjectId, pass: &Pass) -> bool {
        self.state.validated.contains(&(object, pass.clone()))
    }

    /// Records `object` as walked for `passes` and marks it active until
    /// [`leave`](Self::leave) is called with the returned mark.
    pub(crate) fn enter(&mut self, object: &ObjectRef, passes: Vec<Pass>) -> usize {
        let mark = self.active.len();
        for pass in passes {
            self.state.validated.insert((object.id(), pass.clone()));
            self.active.push((object.id(), pass));
        }
        self.visited.push(object.clone());
        mark
    }

    pub(crate) fn leave(&mut self, mark: usize) {
        self.active.truncate(mark);
    }

    /// Starts an isolated attempt.
    ///
    /// Work done before the attempt is forgotten, except for objects still
    /// being walked, so the attempt sees every violation of its elements
    /// while cycles back into the current path still terminate. Returns the
    /// state to hand back to [`restore`](Self::restore).
    pub(crate) fn fork(&mut self) -> PassState {
        let isolated = PassState {
            seen: HashSet::new(),
            validated: self.active.iter().cloned().collect(),
        };
        std::mem::replace(&mut self.state, isolated)
    }

    /// Ends an attempt started by [`fork`](Self::fork), returning what the
    /// attempt did.
    pub(crate) fn restore(&mut self, outer: PassState) -> PassState {
        std::mem::replace(&mut self.state, outer)
    }

    /// Adopts the work of a finished attempt as done.
    pub(crate) fn absorb(&mut self, attempt: PassState) {
        self.state.merge(attempt);
    }

    /// Enters one level of object nesting.
    pub(crate) fn descend(&mut self) -> Result<()> {
        let max_depth = self.resolver.config().max_depth;
        if self.depth >= max_depth {
            return Err(ValidatorError::DepthExceeded { max_depth });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
