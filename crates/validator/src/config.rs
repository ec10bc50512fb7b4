//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default recursion limit for object traversal.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables shared by the resolver and the execution engine.
///
/// # Examples
///
/// ```rust,ignore
/// let config: ValidatorConfig = serde_json::from_str(r#"{"max_depth": 32}"#)?;
/// assert!(config.implicit_class_groups);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Add the class's simple name to every constraint in `Default` while
    /// merging its metadata.
    pub implicit_class_groups: bool,

    /// Maximum object nesting depth before traversal aborts.
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            implicit_class_groups: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidatorConfig {
    /// Only explicitly declared groups select constraints.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            implicit_class_groups: false,
            ..Self::default()
        }
    }

    /// Sets the traversal depth limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
