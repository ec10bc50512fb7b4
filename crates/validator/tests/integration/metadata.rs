//! Hierarchy merging, scopes, caching and declaration-time errors.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use vigil_validator::prelude::*;
use vigil_validator::{ErrorKind, GroupRegistry, PropertyAccess};

use crate::common::{constraint, names, registry};

fn hierarchy() -> TypeRegistry {
    registry([
        TypeDescriptor::interface("Identified").field("id"),
        TypeDescriptor::interface("Named").extends("Identified"),
        TypeDescriptor::interface("Labelled").extends("Identified"),
        TypeDescriptor::class("Entity").implements("Identified").field("id"),
        TypeDescriptor::class("Person")
            .extends("Entity")
            .implements("Named")
            .implements("Labelled")
            .field("name"),
    ])
}

fn validator(spec: Specification) -> Validator {
    Validator::builder()
        .types(hierarchy())
        .specification(spec)
        .build()
}

#[test]
fn merge_order_is_ancestors_then_interfaces_then_own() {
    let spec = Specification::builder()
        .class("Entity", |c| {
            c.property("id", [constraint("FromEntity"), constraint("Shared")]);
        })
        .class("Identified", |c| {
            c.property("id", [constraint("FromIdentified")]);
        })
        .class("Labelled", |c| {
            c.property("id", [constraint("FromLabelled")]);
        })
        .class("Named", |c| {
            c.property("id", [constraint("FromNamed")]);
        })
        .class("Person", |c| {
            c.property("id", [constraint("Shared").option("own", true), constraint("FromPerson")]);
        })
        .build()
        .unwrap();

    let metadata = validator(spec).metadata_for("Person").unwrap();
    let id = metadata.property("id").unwrap();

    assert_eq!(
        names(id.constraints()),
        vec![
            "FromEntity",
            "Shared",
            "FromIdentified",
            "FromNamed",
            "FromLabelled",
            "FromPerson",
        ]
    );
    assert!(id.constraints()[1].get("own").is_some());
    assert_eq!(names(id.local_constraints()), vec!["Shared", "FromPerson"]);
}

#[test]
fn shared_interfaces_contribute_once() {
    let types = hierarchy();
    assert_eq!(
        types.interfaces("Person").unwrap(),
        vec!["Identified", "Named", "Labelled"]
    );
}

#[test]
fn local_scope_excludes_inherited_declarations() {
    let spec = Specification::builder()
        .class("Entity", |c| {
            c.constraint(constraint("Inherited"));
        })
        .class("Person", |c| {
            c.constraint(constraint("Own").in_groups(["Strict"]));
        })
        .build()
        .unwrap();
    let validator = validator(spec);

    let all = validator
        .find_constraints("Person", None, Scope::All, None)
        .unwrap();
    let local = validator
        .find_constraints("Person", None, Scope::Local, None)
        .unwrap();
    let strict = validator
        .find_constraints("Person", None, Scope::All, Some(&["Strict"]))
        .unwrap();

    assert_eq!(names(&all), vec!["Inherited", "Own"]);
    assert_eq!(names(&local), vec!["Own"]);
    assert_eq!(names(&strict), vec!["Own"]);
    assert!(validator
        .find_constraints("Person", Some("missing"), Scope::All, None)
        .unwrap()
        .is_empty());
}

#[test]
fn metadata_is_resolved_once_per_class() {
    let validator = validator(Specification::default());
    let first = validator.metadata_for("Person").unwrap();
    let second = validator.metadata_for("Person").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(validator.resolver().cached(), 1);
}

#[test]
fn property_access_is_resolved_with_metadata() {
    let spec = Specification::builder()
        .class("Person", |c| {
            c.property("name", [constraint("NotBlank")])
                .property("nickname", [constraint("NotBlank")]);
        })
        .build()
        .unwrap();
    let metadata = validator(spec).metadata_for("Person").unwrap();

    assert_eq!(
        metadata.property("name").unwrap().access(),
        Some(&PropertyAccess::DirectField("name".into()))
    );
    assert_eq!(metadata.property("nickname").unwrap().access(), None);
}

#[test]
fn loaders_accumulate_before_merging() {
    struct Programmatic;
    impl MetadataLoader for Programmatic {
        fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool> {
            if class.class() != "Person" {
                return Ok(false);
            }
            class.property("name", [constraint("FromCode")]);
            Ok(true)
        }

        fn load_group_metadata(&self, groups: &mut GroupRegistry) {
            groups.add("Everything", ["Default", "Strict"]);
        }
    }

    let declared = Specification::builder()
        .class("Person", |c| {
            c.property("name", [constraint("FromSpec")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(hierarchy())
        .specification(declared)
        .loader(Programmatic)
        .build();

    let metadata = validator.metadata_for("Person").unwrap();
    assert_eq!(
        names(metadata.property("name").unwrap().constraints()),
        vec!["FromSpec", "FromCode"]
    );
    assert_eq!(validator.resolver().groups().expand(["Everything"]).len(), 3);
}

#[rstest]
#[case::missing_nested_constraints(constraint("All"), "MissingOptions")]
#[case::unknown_option(constraint("Valid").option("deep", true), "InvalidOptions")]
fn option_errors_surface_at_resolution(
    #[case] declared: ConstraintSpecification,
    #[case] expected: &str,
) {
    let spec = Specification::builder()
        .class("Person", |c| {
            c.property("name", [declared]);
        })
        .build()
        .unwrap();

    let err = validator(spec).metadata_for("Person").unwrap_err();
    let variant = match err {
        ValidatorError::MissingOptions { .. } => "MissingOptions",
        ValidatorError::InvalidOptions { .. } => "InvalidOptions",
        _ => "other",
    };
    assert_eq!(variant, expected);
    assert_eq!(err.kind(), ErrorKind::Declaration);
}

#[test]
fn message_option_is_always_accepted() {
    let spec = Specification::builder()
        .class("Person", |c| {
            c.property("name", [constraint("Valid").option("message", "custom")]);
        })
        .build()
        .unwrap();
    assert!(validator(spec).metadata_for("Person").is_ok());
}

#[test]
fn malformed_sequence_from_a_loader_fails_resolution() {
    struct BadSequence;
    impl MetadataLoader for BadSequence {
        fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool> {
            class.group_sequence(["Default", "Strict"]);
            Ok(true)
        }
    }

    let validator = Validator::builder()
        .types(hierarchy())
        .loader(BadSequence)
        .build();
    assert!(matches!(
        validator.metadata_for("Person"),
        Err(ValidatorError::GroupSequence { .. })
    ));
}

#[test]
fn group_sequence_is_not_inherited() {
    let spec = Specification::builder()
        .class("Entity", |c| {
            c.group_sequence(["First", "Second"]);
        })
        .build()
        .unwrap();
    let validator = validator(spec);

    assert!(validator.metadata_for("Entity").unwrap().group_sequence().is_some());
    assert!(validator.metadata_for("Person").unwrap().group_sequence().is_none());
}
