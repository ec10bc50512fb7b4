use std::sync::Arc;

use tracing::trace;

use super::{CacheKey, Command, CommandKind, ValidateConstraint, ValidateProperty};
use crate::engine::context::{ExecutionContext, Pass};
use crate::error::Result;
use crate::finder::ConstraintFinder;
use crate::group::{DEFAULT_GROUP, GroupSet};
use crate::metadata::ClassMetadata;
use crate::types::simple_name;
use crate::value::{ObjectRef, Value};
use crate::violation::{ConstraintViolationList, PropertyPath};

/// Validates an object's class-level constraints and constrained properties.
///
/// Each object is walked at most once per group and pass, whichever path
/// reaches it first.
pub(crate) struct ValidateObject {
    pub(crate) object: ObjectRef,
    pub(crate) groups: Arc<GroupSet>,
    pub(crate) path: PropertyPath,
    /// Cleared while running one step of a group sequence.
    pub(crate) sequenced: bool,
}

impl ValidateObject {
    pub(crate) fn new(object: ObjectRef, groups: Arc<GroupSet>, path: PropertyPath) -> Self {
        Self {
            object,
            groups,
            path,
            sequenced: true,
        }
    }

    fn step(&self, groups: GroupSet) -> Self {
        Self {
            object: self.object.clone(),
            groups: Arc::new(groups),
            path: self.path.clone(),
            sequenced: false,
        }
    }

    /// The class's group sequence, if it stands in for a requested group.
    fn sequence<'m>(&self, metadata: &'m ClassMetadata) -> Option<&'m [String]> {
        if !self.sequenced {
            return None;
        }
        let class_group = simple_name(metadata.class());
        metadata
            .group_sequence()
            .filter(|_| self.groups.contains(DEFAULT_GROUP) || self.groups.contains(class_group))
    }

    /// Runs `sequence` in place of `Default` (or the class group), then the
    /// other requested groups in one step.
    fn run_sequence(
        &self,
        metadata: &ClassMetadata,
        sequence: &[String],
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        if !ctx.is_validated(self.object.id(), &Pass::Sequence) {
            let mark = ctx.enter(&self.object, vec![Pass::Sequence]);
            let result = self.step_through(metadata, sequence, violations, ctx);
            ctx.leave(mark);
            result?;
        }

        let class_group = simple_name(metadata.class());
        let remaining = self.groups.without(&[DEFAULT_GROUP, class_group]);
        if !remaining.is_empty() {
            ctx.run(self.step(remaining), violations)?;
        }
        Ok(())
    }

    fn step_through(
        &self,
        metadata: &ClassMetadata,
        sequence: &[String],
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        for group in sequence {
            let before = violations.len();
            let step = ctx.resolver().groups().expand([group.as_str()]);
            ctx.run(self.step(step), violations)?;
            if violations.len() > before {
                trace!(
                    class = metadata.class(),
                    group = group.as_str(),
                    "group sequence stopped after failing step"
                );
                break;
            }
        }
        Ok(())
    }

    fn walk(
        &self,
        metadata: &ClassMetadata,
        groups: &Arc<GroupSet>,
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        let finder = ConstraintFinder::new(metadata).groups(groups);
        let value = Value::Object(self.object.clone());
        for constraint in finder.find() {
            ctx.run(
                ValidateConstraint {
                    value: value.clone(),
                    constraint,
                    path: self.path.clone(),
                    groups: Arc::clone(groups),
                },
                violations,
            )?;
        }

        for name in metadata.properties().keys() {
            if !finder.property(name).exists() {
                continue;
            }
            ctx.run(
                ValidateProperty {
                    object: self.object.clone(),
                    property: name.clone(),
                    groups: Arc::clone(groups),
                    path: self.path.clone(),
                },
                violations,
            )?;
        }
        Ok(())
    }
}

impl Command for ValidateObject {
    fn kind(&self) -> CommandKind {
        CommandKind::Object
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::of(
            self.kind(),
            &(self.object.id(), self.groups.as_ref(), self.sequenced),
        )
    }

    fn execute(
        self,
        violations: &mut ConstraintViolationList,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<()> {
        let metadata = ctx.resolver().resolve(self.object.class())?;
        if let Some(sequence) = self.sequence(&metadata) {
            return self.run_sequence(&metadata, sequence, violations, ctx);
        }

        let id = self.object.id();
        let pending: GroupSet = self
            .groups
            .iter()
            .filter(|group| !ctx.is_validated(id, &Pass::Group((*group).to_owned())))
            .collect();
        if pending.is_empty() {
            trace!(object = %id, "object already validated for every requested group");
            return Ok(());
        }

        ctx.descend()?;
        let passes = pending.iter().map(|g| Pass::Group(g.to_owned())).collect();
        let mark = ctx.enter(&self.object, passes);
        let result = self.walk(&metadata, &Arc::new(pending), violations, ctx);
        ctx.leave(mark);
        ctx.ascend();
        result
    }
}
