//! Object-graph traversal: paths, deduplication, groups, structural constraints.

use pretty_assertions::assert_eq;
use vigil_validator::prelude::*;
use vigil_validator::ErrorKind;

use crate::common::{Counter, Counting, NOT_BLANK, constraint, not_blank, only_valid, registry};

fn node_validator() -> Validator {
    let types = registry([TypeDescriptor::class("Node").field("name").field("next")]);
    let spec = Specification::builder()
        .class("Node", |c| {
            c.property("name", [constraint("NotBlank")])
                .property("next", [constraint("Valid")]);
        })
        .build()
        .unwrap();
    Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build()
}

// ============================================================================
// VIOLATION SHAPE
// ============================================================================

#[test]
fn failure_parameters_are_substituted_into_the_message() {
    struct Fixed;
    impl ConstraintValidator for Fixed {
        fn validate(
            &self,
            _value: &Value,
            _constraint: &std::sync::Arc<ConstraintSpecification>,
            _scope: &mut ConstraintScope<'_, '_>,
        ) -> Result<Outcome> {
            Ok(Failure::new("message: %param%")
                .with_parameter("%param%", "value")
                .into())
        }
    }

    let types = registry([TypeDescriptor::class("Author").field("firstName")]);
    let spec = Specification::builder()
        .class("Author", |c| {
            c.property("firstName", [constraint("Fixed")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("Fixed", Fixed)
        .build();

    let author = ObjectRef::new("Author").with_field("firstName", "Fabien");
    let violations = validator.validate_object(&author, &[]).unwrap();

    assert_eq!(violations.len(), 1);
    let violation = &violations[0];
    assert_eq!(violation.message, "message: value");
    assert_eq!(violation.message_template, "message: %param%");
    assert_eq!(violation.parameter("%param%"), Some("value"));
    assert_eq!(violation.property_path, "firstName");
    assert_eq!(violation.invalid_value, Value::from("Fabien"));
    assert_eq!(violation.root, Value::from(&author));
    assert_eq!(violation.constraint, "Fixed");
}

#[test]
fn message_option_overrides_the_plugin_template() {
    let types = registry([TypeDescriptor::class("Author").field("firstName")]);
    let spec = Specification::builder()
        .class("Author", |c| {
            c.property(
                "firstName",
                [constraint("OnlyValid").option("message", "Got %value% instead")],
            );
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("OnlyValid", only_valid())
        .build();

    let author = ObjectRef::new("Author").with_field("firstName", "nope");
    let violations = validator.validate_object(&author, &[]).unwrap();
    assert_eq!(violations.messages(), vec!["Got nope instead"]);
}

// ============================================================================
// IDENTITY AND CYCLES
// ============================================================================

#[test]
fn cyclic_graphs_terminate_and_report_each_violation_once() {
    let validator = node_validator();
    let x = ObjectRef::new("Node").with_field("name", "");
    let y = ObjectRef::new("Node")
        .with_field("name", "")
        .with_field("next", &x);
    x.set("next", &y);

    let violations = validator.validate_object(&x, &[]).unwrap();

    let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
    assert_eq!(paths, vec!["name", "next.name"]);
}

#[test]
fn self_reference_is_validated_once() {
    let validator = node_validator();
    let node = ObjectRef::new("Node").with_field("name", "");
    node.set("next", &node);

    let violations = validator.validate_object(&node, &[]).unwrap();
    assert_eq!(violations.len(), 1);
}

#[test]
fn shared_object_reached_twice_is_validated_once() {
    let types = registry([
        TypeDescriptor::class("Pair").field("left").field("right"),
        TypeDescriptor::class("Node").field("name").field("next"),
    ]);
    let spec = Specification::builder()
        .class("Pair", |c| {
            c.property("left", [constraint("Valid")])
                .property("right", [constraint("Valid")]);
        })
        .class("Node", |c| {
            c.property("name", [constraint("NotBlank")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build();

    let shared = ObjectRef::new("Node").with_field("name", "");
    let pair = ObjectRef::new("Pair")
        .with_field("left", &shared)
        .with_field("right", &shared);
    let violations = validator.validate_object(&pair, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].property_path, "left.name");

    let twin = ObjectRef::new("Node").with_field("name", "");
    pair.set("right", &twin);
    let violations = validator.validate_object(&pair, &[]).unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[1].property_path, "right.name");
}

#[test]
fn depth_limit_aborts_deep_graphs() {
    let types = registry([TypeDescriptor::class("Node").field("name").field("next")]);
    let spec = Specification::builder()
        .class("Node", |c| {
            c.property("next", [constraint("Valid")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .config(ValidatorConfig::default().with_max_depth(3))
        .build();

    let mut head = ObjectRef::new("Node");
    for _ in 0..5 {
        head = ObjectRef::new("Node").with_field("next", &head);
    }

    let err = validator.validate_object(&head, &[]).unwrap_err();
    assert!(matches!(err, ValidatorError::DepthExceeded { max_depth: 3 }));
    assert_eq!(err.kind(), ErrorKind::Execution);
}

// ============================================================================
// GROUPS
// ============================================================================

fn sequenced_validator(a_counter: &Counter, b_counter: &Counter, a_passes: bool) -> Validator {
    let types = registry([TypeDescriptor::class("Account").field("a").field("b")]);
    let spec = Specification::builder()
        .class("Account", |c| {
            c.property("a", [constraint("CheckA").in_groups(["GroupA"])])
                .property("b", [constraint("CheckB").in_groups(["GroupB"])])
                .group_sequence(["GroupA", "GroupB"]);
        })
        .build()
        .unwrap();
    let check_a = if a_passes {
        Counting::passing(a_counter)
    } else {
        Counting::failing(a_counter)
    };
    Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("CheckA", check_a)
        .constraint("CheckB", Counting::failing(b_counter))
        .build()
}

#[test]
fn group_sequence_stops_after_the_first_failing_step() {
    let (a, b) = (Counter::default(), Counter::default());
    let validator = sequenced_validator(&a, &b, false);

    let violations = validator
        .validate_object(&ObjectRef::new("Account"), &[])
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].constraint, "CheckA");
    assert_eq!(a.count(), 1);
    assert_eq!(b.count(), 0);
}

#[test]
fn group_sequence_continues_while_steps_pass() {
    let (a, b) = (Counter::default(), Counter::default());
    let validator = sequenced_validator(&a, &b, true);

    let violations = validator
        .validate_object(&ObjectRef::new("Account"), &["Account"])
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].constraint, "CheckB");
    assert_eq!(b.count(), 1);
}

#[test]
fn explicit_groups_bypass_the_sequence() {
    let (a, b) = (Counter::default(), Counter::default());
    let validator = sequenced_validator(&a, &b, false);

    let violations = validator
        .validate_object(&ObjectRef::new("Account"), &["GroupA", "GroupB"])
        .unwrap();

    assert_eq!(violations.len(), 2);
    assert_eq!((a.count(), b.count()), (1, 1));
}

#[test]
fn cycle_through_a_sequenced_class_reports_each_violation_once() {
    let types = registry([
        TypeDescriptor::class("Left").field("name").field("friend"),
        TypeDescriptor::class("Right").field("friend"),
    ]);
    let spec = Specification::builder()
        .class("Left", |c| {
            c.property("name", [constraint("NotBlank").in_groups(["GroupA"])])
                .property("friend", [constraint("Valid").in_groups(["GroupA"])])
                .group_sequence(["GroupA", "GroupB"]);
        })
        .class("Right", |c| {
            c.property("friend", [constraint("Valid").in_groups(["GroupA"])]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build();

    let left = ObjectRef::new("Left").with_field("name", "");
    let right = ObjectRef::new("Right").with_field("friend", &left);
    left.set("friend", &right);

    let violations = validator.validate_object(&left, &[]).unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
    assert_eq!(paths, vec!["name"]);
}

#[test]
fn groups_select_constraints() {
    let types = registry([TypeDescriptor::class("User").field("email").field("name")]);
    let spec = Specification::builder()
        .class("User", |c| {
            c.property("email", [constraint("NotBlank").in_groups(["Registration"])])
                .property("name", [constraint("NotBlank")]);
        })
        .group("Strict", ["Default", "Registration"])
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build();
    let user = ObjectRef::new("User");

    let default = validator.validate_object(&user, &[]).unwrap();
    assert_eq!(default[0].property_path, "name");
    assert_eq!(default.len(), 1);

    let class_group = validator.validate_object(&user, &["User"]).unwrap();
    assert_eq!(class_group, default);

    let registration = validator.validate_object(&user, &["Registration"]).unwrap();
    assert_eq!(registration.len(), 1);
    assert_eq!(registration[0].property_path, "email");

    let strict = validator.validate_object(&user, &["Strict"]).unwrap();
    assert_eq!(strict.len(), 2);
}

#[test]
fn constraints_in_several_requested_groups_run_once() {
    let types = registry([TypeDescriptor::class("User").field("name")]);
    let spec = Specification::builder()
        .class("User", |c| {
            c.property("name", [constraint("NotBlank").in_groups(["A", "B"])]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build();

    let violations = validator
        .validate_object(&ObjectRef::new("User"), &["A", "B"])
        .unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, NOT_BLANK);
}

// ============================================================================
// STRUCTURAL CONSTRAINTS
// ============================================================================

fn collection_validator(name: &str) -> Validator {
    let types = registry([TypeDescriptor::class("Form").field("tags")]);
    let spec = Specification::builder()
        .class("Form", |c| {
            c.property(
                "tags",
                [constraint(name).option("constraints", vec![constraint("OnlyValid")])],
            );
        })
        .build()
        .unwrap();
    Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("OnlyValid", only_valid())
        .build()
}

fn form(tags: &[&str]) -> ObjectRef {
    ObjectRef::new("Form").with_field("tags", tags.to_vec())
}

#[test]
fn all_reports_every_failing_element() {
    let validator = collection_validator("All");

    let violations = validator
        .validate_object(&form(&["foo", "bar", "VALID"]), &[])
        .unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
    assert_eq!(paths, vec!["tags[0]", "tags[1]"]);
    assert_eq!(violations[1].message, "bar is not VALID");

    let clean = validator
        .validate_object(&form(&["VALID", "VALID", "VALID"]), &[])
        .unwrap();
    assert!(clean.is_empty());
}

#[test]
fn any_passes_when_one_element_is_valid() {
    let validator = collection_validator("Any");

    let violations = validator
        .validate_object(&form(&["foo", "bar"]), &[])
        .unwrap();
    assert_eq!(violations.len(), 2);

    let clean = validator
        .validate_object(&form(&["foo", "VALID"]), &[])
        .unwrap();
    assert!(clean.is_empty());

    let empty = validator.validate_object(&form(&[]), &[]).unwrap();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].constraint, "Any");
}

fn holder_validator(main_first: bool) -> Validator {
    let types = registry([
        TypeDescriptor::class("Holder").field("choices").field("main"),
        TypeDescriptor::class("Node").field("name"),
    ]);
    let spec = Specification::builder()
        .class("Holder", |c| {
            let choices = constraint("Any").option("constraints", vec![constraint("Valid")]);
            if main_first {
                c.property("main", [constraint("Valid")]);
            }
            c.property("choices", [choices]);
            if !main_first {
                c.property("main", [constraint("Valid")]);
            }
        })
        .class("Node", |c| {
            c.property("name", [constraint("NotBlank")]);
        })
        .build()
        .unwrap();
    Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build()
}

#[test]
fn any_attempts_do_not_hide_objects_validated_elsewhere() {
    let validator = holder_validator(false);
    let blank = ObjectRef::new("Node").with_field("name", "");
    let named = ObjectRef::new("Node").with_field("name", "ok");
    let holder = ObjectRef::new("Holder")
        .with_field("choices", Value::List(vec![Value::from(&blank), Value::from(&named)]))
        .with_field("main", &blank);

    let violations = validator.validate_object(&holder, &[]).unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
    assert_eq!(paths, vec!["main.name"]);
}

#[test]
fn any_judges_elements_already_validated_elsewhere() {
    let validator = holder_validator(true);
    let blank = ObjectRef::new("Node").with_field("name", "");
    let holder = ObjectRef::new("Holder")
        .with_field("main", &blank)
        .with_field("choices", Value::List(vec![Value::from(&blank)]));

    let violations = validator.validate_object(&holder, &[]).unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
    assert_eq!(paths, vec!["main.name", "choices[0].name"]);
}

#[test]
fn any_attempt_cycling_back_to_its_owner_terminates() {
    let validator = holder_validator(false);
    let named = ObjectRef::new("Node").with_field("name", "ok");
    let holder = ObjectRef::new("Holder").with_field("main", &named);
    holder.set("choices", Value::List(vec![Value::from(&holder)]));

    let violations = validator.validate_object(&holder, &[]).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn valid_cascades_into_lists_with_indexed_paths() {
    let types = registry([
        TypeDescriptor::class("Library").field("books"),
        TypeDescriptor::class("Book").field("title"),
    ]);
    let spec = Specification::builder()
        .class("Library", |c| {
            c.property("books", [constraint("Valid")]);
        })
        .class("Book", |c| {
            c.property("title", [constraint("NotBlank")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build();

    let books = vec![
        Value::from(ObjectRef::new("Book").with_field("title", "Dune")),
        Value::from(ObjectRef::new("Book")),
    ];
    let library = ObjectRef::new("Library").with_field("books", books);

    let violations = validator.validate_object(&library, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].property_path, "books[1].title");
    assert_eq!(violations[0].root, Value::from(&library));
}

#[test]
fn valid_with_class_reports_type_mismatch() {
    let types = registry([
        TypeDescriptor::interface("Publication"),
        TypeDescriptor::class("Shelf").field("item"),
        TypeDescriptor::class("Book").implements("Publication"),
        TypeDescriptor::class("Magazine"),
    ]);
    let spec = Specification::builder()
        .class("Shelf", |c| {
            c.property("item", [constraint("Valid").option("class", "Publication")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder().types(types).specification(spec).build();

    let book_shelf = ObjectRef::new("Shelf").with_field("item", ObjectRef::new("Book"));
    assert!(validator.validate_object(&book_shelf, &[]).unwrap().is_empty());

    let magazine_shelf = ObjectRef::new("Shelf").with_field("item", ObjectRef::new("Magazine"));
    let violations = validator.validate_object(&magazine_shelf, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "This value should be an instance of Publication."
    );
    assert_eq!(violations[0].property_path, "item");
}

// ============================================================================
// PROPERTY ACCESS
// ============================================================================

#[test]
fn getters_and_boolean_accessors_are_read() {
    let types = registry([TypeDescriptor::class("Person")
        .field("first")
        .field("last")
        .method("getFullName", |o| {
            let part = |name| o.get(name).map(|v| v.to_string()).unwrap_or_default();
            Value::from(format!("{} {}", part("first"), part("last")).trim().to_owned())
        })
        .method("isActive", |o| o.get("active").unwrap_or(Value::Bool(false)))]);
    let spec = Specification::builder()
        .class("Person", |c| {
            c.getter("fullName", [constraint("NotBlank")])
                .property("active", [constraint("IsTrue")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .constraint(
            "IsTrue",
            FnValidator::new(|value: &Value, _: &ConstraintSpecification| {
                Outcome::check(value.as_bool() == Some(true), "This value should be true.")
            }),
        )
        .build();

    let nobody = ObjectRef::new("Person");
    let violations = validator.validate_object(&nobody, &[]).unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
    assert_eq!(paths, vec!["fullName", "active"]);

    let ada = ObjectRef::new("Person")
        .with_field("first", "Ada")
        .with_field("active", true);
    assert!(validator.validate_object(&ada, &[]).unwrap().is_empty());
}

#[test]
fn unreadable_property_is_an_access_error() {
    let types = registry([TypeDescriptor::class("Author")]);
    let spec = Specification::builder()
        .class("Author", |c| {
            c.property("ghost", [constraint("NotBlank")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder()
        .types(types)
        .specification(spec)
        .constraint("NotBlank", not_blank())
        .build();

    let err = validator
        .validate_object(&ObjectRef::new("Author"), &[])
        .unwrap_err();
    assert!(matches!(err, ValidatorError::Access { ref property, .. } if property == "ghost"));
}

#[test]
fn unregistered_constraint_is_an_execution_error() {
    let types = registry([TypeDescriptor::class("Author").field("name")]);
    let spec = Specification::builder()
        .class("Author", |c| {
            c.property("name", [constraint("Nope")]);
        })
        .build()
        .unwrap();
    let validator = Validator::builder().types(types).specification(spec).build();

    let err = validator
        .validate_object(&ObjectRef::new("Author"), &[])
        .unwrap_err();
    assert!(matches!(err, ValidatorError::UnknownConstraint { .. }));
}

#[test]
fn unregistered_class_is_a_resolution_error() {
    let validator = Validator::builder().build();
    let err = validator
        .validate_object(&ObjectRef::new("Ghost"), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

#[test]
fn validate_value_checks_a_candidate_without_an_object() {
    let validator = node_validator();

    let violations = validator.validate_value("Node", "name", "", &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].property_path, "name");
    assert_eq!(violations[0].root, Value::from(""));

    assert!(validator
        .validate_value("Node", "name", "ok", &[])
        .unwrap()
        .is_empty());
}

#[test]
fn validate_property_checks_one_property_and_cascades() {
    let validator = node_validator();
    let inner = ObjectRef::new("Node").with_field("name", "");
    let outer = ObjectRef::new("Node")
        .with_field("name", "")
        .with_field("next", &inner);

    let name_only = validator.validate_property(&outer, "name", &[]).unwrap();
    assert_eq!(name_only.len(), 1);

    let cascaded = validator.validate_property(&outer, "next", &[]).unwrap();
    assert_eq!(cascaded.len(), 1);
    assert_eq!(cascaded[0].property_path, "next.name");
}

#[test]
fn validate_property_rejects_unknown_properties() {
    let validator = node_validator();
    let node = ObjectRef::new("Node");

    assert!(validator.validate_property(&node, "nowhere", &[]).is_err());
}
