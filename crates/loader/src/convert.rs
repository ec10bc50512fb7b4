//! Conversion of parsed documents into validator declarations.

use indexmap::IndexMap;
use serde_json::Value as Json;
use vigil_validator::constraints::CONSTRAINTS_OPTION;
use vigil_validator::{ClassBuilder, ConstraintSpecification, OptionValue};

use crate::document::{ClassDocument, ConstraintEntry, ConstraintDocument};
use crate::error::{LoaderError, LoaderResult};

/// Key that marks a JSON object inside an option as a nested constraint.
const NESTED_MARKER: &str = "constraint";

/// Converted declarations for one class, ready to apply to a builder.
#[derive(Debug, Default)]
pub(crate) struct ClassDeclarations {
    constraints: Vec<ConstraintSpecification>,
    properties: Vec<(String, Vec<ConstraintSpecification>)>,
    getters: Vec<(String, Vec<ConstraintSpecification>)>,
    group_sequence: Option<Vec<String>>,
}

impl ClassDeclarations {
    pub(crate) fn apply(self, class: &mut ClassBuilder) {
        for constraint in self.constraints {
            class.constraint(constraint);
        }
        for (name, constraints) in self.properties {
            class.property(name, constraints);
        }
        for (name, constraints) in self.getters {
            class.getter(name, constraints);
        }
        if let Some(sequence) = self.group_sequence {
            class.group_sequence(sequence);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.constraints.is_empty()
            && self.properties.is_empty()
            && self.getters.is_empty()
            && self.group_sequence.is_none()
    }
}

impl TryFrom<ClassDocument> for ClassDeclarations {
    type Error = LoaderError;

    fn try_from(document: ClassDocument) -> LoaderResult<Self> {
        Ok(Self {
            constraints: constraints(document.constraints)?,
            properties: members(document.properties)?,
            getters: members(document.getters)?,
            group_sequence: document.group_sequence,
        })
    }
}

fn members(
    declared: IndexMap<String, Vec<ConstraintEntry>>,
) -> LoaderResult<Vec<(String, Vec<ConstraintSpecification>)>> {
    declared
        .into_iter()
        .map(|(name, entries)| Ok((name, constraints(entries)?)))
        .collect()
}

pub(crate) fn constraints(entries: Vec<ConstraintEntry>) -> LoaderResult<Vec<ConstraintSpecification>> {
    entries.into_iter().map(constraint).collect()
}

pub(crate) fn constraint(entry: ConstraintEntry) -> LoaderResult<ConstraintSpecification> {
    let ConstraintDocument {
        name,
        groups,
        options,
    } = match entry {
        ConstraintEntry::Name(name) => return Ok(ConstraintSpecification::new(name)),
        ConstraintEntry::Full(document) => document,
    };

    let mut spec = ConstraintSpecification::new(name.as_str()).in_groups(groups);
    for (key, value) in options {
        let value = if key == CONSTRAINTS_OPTION {
            nested_list(&name, &key, value)?
        } else {
            option_value(&name, &key, value)?
        };
        spec = spec.option(key, value);
    }
    Ok(spec)
}

/// `constraints` accepts a single entry or a list of entries, bare names
/// included.
fn nested_list(constraint_name: &str, key: &str, value: Json) -> LoaderResult<OptionValue> {
    let entries = match value {
        Json::Array(items) => items,
        single => vec![single],
    };
    entries
        .into_iter()
        .map(|item| nested(constraint_name, key, item))
        .collect::<LoaderResult<Vec<_>>>()
        .map(OptionValue::from)
}

fn nested(constraint_name: &str, key: &str, value: Json) -> LoaderResult<ConstraintSpecification> {
    let entry: ConstraintEntry = serde_json::from_value(value).map_err(|e| {
        LoaderError::option(constraint_name, key, format!("not a constraint: {e}"))
    })?;
    constraint(entry)
}

fn is_nested(value: &Json) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key(NESTED_MARKER))
}

fn option_value(constraint_name: &str, key: &str, value: Json) -> LoaderResult<OptionValue> {
    Ok(match value {
        Json::Null => OptionValue::Null,
        Json::Bool(b) => OptionValue::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => OptionValue::Int(i),
            None => n.as_f64().map_or(OptionValue::Null, OptionValue::Float),
        },
        Json::String(s) => OptionValue::String(s),
        Json::Array(items) if !items.is_empty() && items.iter().all(is_nested) => {
            nested_list(constraint_name, key, Json::Array(items))?
        }
        Json::Array(items) => OptionValue::List(
            items
                .into_iter()
                .map(|item| option_value(constraint_name, key, item))
                .collect::<LoaderResult<_>>()?,
        ),
        object @ Json::Object(_) if is_nested(&object) => {
            OptionValue::from(nested(constraint_name, key, object)?)
        }
        Json::Object(map) => OptionValue::Map(
            map.into_iter()
                .map(|(k, v)| Ok((k, option_value(constraint_name, key, v)?)))
                .collect::<LoaderResult<_>>()?,
        ),
    })
}
