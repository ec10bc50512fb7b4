//! Declared constraints and their option values.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::group::{DEFAULT_GROUP, GroupSet};

/// Option carrying a per-constraint override of the plugin's message.
pub const MESSAGE_OPTION: &str = "message";

/// A single option value attached to a constraint declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionValue {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    String(String),
    /// List of option values.
    List(Vec<OptionValue>),
    /// Nested mapping.
    Map(IndexMap<String, OptionValue>),
    /// Nested constraint declarations, as used by `All` and `Any`.
    Constraints(Vec<Arc<ConstraintSpecification>>),
}

impl OptionValue {
    /// Returns the string if this is a string option.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer option.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean option.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns nested constraints if this option holds some.
    #[must_use]
    pub fn as_constraints(&self) -> Option<&[Arc<ConstraintSpecification>]> {
        match self {
            Self::Constraints(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Map(entries) => {
                let rendered: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Constraints(list) => {
                let names: Vec<&str> = list.iter().map(|c| c.name()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for OptionValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for OptionValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<ConstraintSpecification> for OptionValue {
    fn from(constraint: ConstraintSpecification) -> Self {
        Self::Constraints(vec![Arc::new(constraint)])
    }
}

impl From<Vec<ConstraintSpecification>> for OptionValue {
    fn from(constraints: Vec<ConstraintSpecification>) -> Self {
        Self::Constraints(constraints.into_iter().map(Arc::new).collect())
    }
}

// ============================================================================
// CONSTRAINT SPECIFICATION
// ============================================================================

/// A named, option-bearing constraint as declared on a class or property.
///
/// The name selects the validator plugin. Groups default to `{"Default"}`
/// and are never empty.
///
/// # Examples
///
/// ```rust,ignore
/// let length = ConstraintSpecification::new("Length")
///     .option("min", 3)
///     .option("message", "Too short: %limit%")
///     .in_groups(["Strict"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpecification {
    name: String,
    groups: IndexSet<String>,
    options: IndexMap<String, OptionValue>,
}

impl ConstraintSpecification {
    /// Creates a declaration in the `Default` group with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: IndexSet::from([DEFAULT_GROUP.to_owned()]),
            options: IndexMap::new(),
        }
    }

    /// Replaces the group set. An empty iterator keeps the current groups.
    #[must_use = "builder methods must be chained or built"]
    pub fn in_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: IndexSet<String> = groups.into_iter().map(Into::into).collect();
        if !groups.is_empty() {
            self.groups = groups;
        }
        self
    }

    /// Sets an option.
    #[must_use = "builder methods must be chained or built"]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Groups this constraint belongs to.
    #[must_use]
    pub fn groups(&self) -> &IndexSet<String> {
        &self.groups
    }

    /// All declared options in declaration order.
    #[must_use]
    pub fn options(&self) -> &IndexMap<String, OptionValue> {
        &self.options
    }

    /// Looks up one option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Nested constraints stored under `key`, or an empty slice.
    #[must_use]
    pub fn nested(&self, key: &str) -> &[Arc<ConstraintSpecification>] {
        self.get(key)
            .and_then(OptionValue::as_constraints)
            .unwrap_or_default()
    }

    /// Message override, if declared.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.get(MESSAGE_OPTION).and_then(OptionValue::as_str)
    }

    /// Returns `true` if the constraint belongs to `group`.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Returns `true` if any of the constraint's groups is in `groups`.
    #[must_use]
    pub fn in_any(&self, groups: &GroupSet) -> bool {
        self.groups.iter().any(|g| groups.contains(g))
    }

    /// Copy of this declaration that also belongs to `group`.
    #[must_use]
    pub(crate) fn with_group(&self, group: &str) -> Self {
        let mut copy = self.clone();
        copy.groups.insert(group.to_owned());
        copy
    }
}
