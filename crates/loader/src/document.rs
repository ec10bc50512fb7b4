//! Serde model of a JSON declaration document.
//!
//! ```json
//! {
//!   "classes": {
//!     "Author": {
//!       "constraints": ["Valid"],
//!       "properties": {
//!         "firstName": ["NotBlank", {"name": "Length", "options": {"min": 4}}]
//!       },
//!       "getters": { "lastName": ["NotBlank"] },
//!       "group_sequence": ["Author", "Strict"]
//!     }
//!   },
//!   "groups": { "Registration": ["Default", "Strict"] }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use vigil_validator::Specification;

use crate::convert::ClassDeclarations;
use crate::error::LoaderResult;

/// Whole declaration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Declarations keyed by class or interface name.
    #[serde(default)]
    pub classes: IndexMap<String, ClassDocument>,
    /// Group compositions: group name to its constituent groups.
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

/// Declarations for one class.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDocument {
    /// Class-level constraints.
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
    /// Member property constraints.
    #[serde(default)]
    pub properties: IndexMap<String, Vec<ConstraintEntry>>,
    /// Getter-style property constraints.
    #[serde(default)]
    pub getters: IndexMap<String, Vec<ConstraintEntry>>,
    /// Explicit group sequence.
    #[serde(default)]
    pub group_sequence: Option<Vec<String>>,
}

/// A constraint written either as a bare name or as a full object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConstraintEntry {
    /// `"NotBlank"`: default group, no options.
    Name(String),
    /// `{"name": "Length", "groups": [...], "options": {...}}`.
    Full(ConstraintDocument),
}

/// Fully spelled-out constraint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintDocument {
    /// Constraint name. Nested declarations may spell it `constraint`.
    #[serde(alias = "constraint")]
    pub name: String,
    /// Groups; empty means `Default`.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Raw option values.
    #[serde(default)]
    pub options: IndexMap<String, serde_json::Value>,
}

impl Document {
    /// Converts the document into an immutable [`Specification`].
    pub fn into_specification(self) -> LoaderResult<Specification> {
        let mut builder = Specification::builder();
        for (class, document) in self.classes {
            let declarations = ClassDeclarations::try_from(document)?;
            builder = builder.class(class, |c| declarations.apply(c));
        }
        for (name, subgroups) in self.groups {
            builder = builder.group(name, subgroups);
        }
        Ok(builder.build()?)
    }
}
