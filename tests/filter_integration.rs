//! Integration tests for building, validating and round-tripping filter trees.
//!
//! These tests exercise the public facade the way a host application
//! would: a field registry, a tree built through the editing API, and the
//! JSON codec at the boundary.

use filtree::prelude::*;
use filtree::query::{
    ErrorCode, FieldRenamer, LabeledNode, Localization, SharedFilter, TextRenderer,
    default_operator, is_valid_operator, validate_payload,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn registry() -> FieldRegistry {
    FieldRegistry::new([
        FilterField::new("age", "Age", DataType::Number),
        FilterField::new("name", "Name", DataType::String),
        FilterField::new("joined", "Joined", DataType::Datetime),
        FilterField::new("active", "Active", DataType::Boolean),
        FilterField::new("meta", "Meta", DataType::Object),
    ])
    .expect("valid registry")
}

fn sample_tree() -> Group {
    Group::and()
        .with_child(Condition::new("age", "between").with_value(vec![18, 65]))
        .with_child(
            Group::or()
                .with_child(Condition::new("name", "startsWith").with_value("A"))
                .with_child(Condition::new("name", "isBlank"))
                .with_child(Group::and().with_child(
                    Condition::new("joined", "after").with_value("2024-01-01T00:00:00Z"),
                )),
        )
        .with_child(Condition::new("active", "equals").with_value(true))
}

// ==================== Scenarios ====================

#[test]
fn test_between_on_number_is_valid() {
    let fields = FieldRegistry::new([FilterField::new("age", "Age", DataType::Number)]).unwrap();
    let condition = Condition::new("age", "between").with_value(vec![18, 65]);

    let result = validate_condition(&condition, &fields);
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
}

#[test]
fn test_contains_on_number_is_rejected() {
    let fields = FieldRegistry::new([FilterField::new("age", "Age", DataType::Number)]).unwrap();
    let condition = Condition::new("age", "contains").with_value("x");

    let result = validate_condition(&condition, &fields);
    assert!(!result.is_valid);
    assert!(result.messages().contains(&"Invalid operator for selected field type"));
}

#[test]
fn test_empty_field_reports_field_rules_once() {
    let condition = Condition::new("", "equals").with_value(5);
    let messages = validate_condition(&condition, &registry()).messages();

    assert!(messages.contains(&"Field is required"));
    let lookups = messages
        .iter()
        .filter(|m| **m == "Selected field does not exist")
        .count();
    assert_eq!(lookups, 1);
    assert_eq!(messages.len(), 2);
}

#[test]
fn test_group_reports_only_invalid_child() {
    let invalid = Condition::new("age", "contains").with_value("x");
    let group = Group::and()
        .with_child(Condition::new("age", "equals").with_value(3))
        .with_child(invalid.clone());

    let aggregate = validate_group(&group, &registry());
    assert!(!aggregate.is_valid);
    assert_eq!(aggregate.errors, validate_condition(&invalid, &registry()).errors);
}

#[test]
fn test_boolean_catalog() {
    let ops: Vec<_> = operators_for(DataType::Boolean)
        .iter()
        .map(|op| op.value)
        .collect();
    assert_eq!(ops, vec!["equals", "notEquals"]);
}

#[test]
fn test_unknown_tag_fails_to_decode() {
    let err = FilterNode::from_json(&json!({"type": "bogus", "field": "age"})).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownNodeType);
    assert!(err.is_structural());

    let nested = json!({
        "type": "group",
        "operator": "AND",
        "children": [
            {"type": "condition", "field": "age", "operator": "equals", "value": 1},
            {"type": "bogus"}
        ]
    });
    let err = Group::from_json(&nested).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownNodeType);
    assert_eq!(err.context.path.as_deref(), Some("$.children[1]"));
}

// ==================== Properties ====================

#[test]
fn test_round_trip_preserves_structure() {
    let tree = sample_tree();

    let text = tree.to_json_string().unwrap();
    let restored: Group = text.parse().unwrap();
    assert_eq!(restored, tree);

    let value = serde_json::to_value(&tree).unwrap();
    let restored: FilterNode = serde_json::from_value(value).unwrap();
    assert_eq!(restored, FilterNode::from(tree));
}

#[test]
fn test_round_trip_keeps_null_distinct_from_absent() {
    let tree = Group::or()
        .with_child(Condition::new("name", "equals").with_value(FilterValue::Null))
        .with_child(Condition::new("name", "equals"));

    let json = tree.to_json();
    assert_eq!(json["children"][0]["value"], serde_json::Value::Null);
    assert!(json["children"][1].get("value").is_none());

    let restored = Group::from_json(&json).unwrap();
    assert_eq!(restored, tree);
    assert_eq!(
        validate_group(&restored, &registry()).messages(),
        vec!["Value is required"]
    );
}

#[test]
fn test_clone_is_deep() {
    let original = sample_tree();
    let mut copy = original.clone();
    assert_eq!(copy, original);

    let nested = copy.children()[1].id();
    copy.find_mut(&nested)
        .and_then(FilterNode::as_group_mut)
        .unwrap()
        .clear();

    assert_ne!(copy, original);
    assert_eq!(original.children()[1].as_group().unwrap().len(), 3);
}

#[test]
fn test_validation_is_monotonic() {
    let fields = registry();
    let mut group = Group::and();
    group.add_child(Condition::new("age", "contains").with_value("x"));
    let bad = group.add_child(Condition::new("name", "equals"));
    let before = validate_group(&group, &fields).errors;

    group.add_child(Condition::new("active", "equals").with_value(false));
    assert_eq!(validate_group(&group, &fields).errors, before);

    group.remove_child(&bad);
    assert_eq!(
        validate_group(&group, &fields).messages(),
        vec!["Invalid operator for selected field type"]
    );
}

#[test]
fn test_catalog_totality() {
    for data_type in DataType::ALL {
        if matches!(data_type, DataType::Object | DataType::Array) {
            assert!(operators_for(data_type).is_empty());
            continue;
        }
        assert!(!operators_for(data_type).is_empty());
        assert!(is_valid_operator(default_operator(data_type), data_type));
    }
}

// ==================== Editing and tooling ====================

#[test]
fn test_removal_by_identity() {
    let mut root = Group::and();
    let first = root.add_child(Condition::new("age", "equals").with_value(1));
    let twin = root.add_child(Condition::new("age", "equals").with_value(1));

    let removed = root.remove_child(&twin).unwrap();
    assert_eq!(removed.id(), twin);
    assert_eq!(root.children()[0].id(), first);
}

#[test]
fn test_duplicated_condition_is_removed_on_its_own() {
    let mut root = Group::and();
    let original = root.add_condition("age", "equals");
    let copy = root.find(&original).cloned().unwrap();
    let copy = root.add_child(copy);
    assert_ne!(copy, original);

    root.find_mut(&copy)
        .and_then(FilterNode::as_condition_mut)
        .unwrap()
        .set_value(2);
    root.remove_child(&copy).unwrap();

    assert_eq!(root.len(), 1);
    assert_eq!(root.children()[0].id(), original);
    assert_eq!(root.children()[0].as_condition().unwrap().value(), None);
}

#[test]
fn test_round_trip_of_edge_values() {
    let tree = Group::or()
        .with_child(Condition::new("age", "equals").with_value(f64::INFINITY))
        .with_child(Condition::new("age", "equals").with_value(FilterValue::Json(json!([1, 2]))))
        .with_child(Condition::new("name", "equals").with_value(FilterValue::Json(json!("x"))))
        .with_child(Condition::new("meta", "equals").with_value(json!({"k": 1})))
        .with_child(Condition::new("age", "greaterThan").with_value(0.1 + 0.2));

    let text = tree.to_json_string().unwrap();
    assert_eq!(text.parse::<Group>().unwrap(), tree);
    assert_eq!(
        tree.children()[0].as_condition().unwrap().value(),
        Some(&FilterValue::Null)
    );
}

#[test]
fn test_large_tree_round_trips() {
    let mut tree = Group::and().with_children(
        (0..1500).map(|i| Condition::new("name", "contains").with_value(format!("n{i}"))),
    );
    for _ in 0..50 {
        tree = Group::or().with_child(tree);
    }

    let restored: Group = tree.to_json_string().unwrap().parse().unwrap();
    assert_eq!(restored, tree);
    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(serde_json::from_value::<Group>(value).unwrap(), tree);

    let err = Group::parse_with(&tree.to_json_string().unwrap(), &ParseLimits::default())
        .unwrap_err();
    assert!(err.is_limit());
}

#[test]
fn test_object_fields_have_no_operators() {
    let condition = Condition::new("meta", "equals").with_value(json!({"k": 1}));
    assert_eq!(
        validate_condition(&condition, &registry()).messages(),
        vec!["Invalid operator for selected field type"]
    );
}

#[test]
fn test_lenient_payload_validation() {
    let payload = json!({
        "type": "group",
        "operator": "NAND",
        "children": [{"type": "condition", "field": "age", "operator": "equals", "value": 4}]
    });

    assert_eq!(
        Group::from_json(&payload).unwrap_err().code,
        ErrorCode::InvalidGroupOperator
    );
    assert_eq!(
        validate_payload(&payload, &registry()).messages(),
        vec!["Invalid group operator"]
    );
}

#[test]
fn test_rename_then_render() {
    let fields = registry();
    let mut tree = Group::and().with_child(Condition::new("years", "greaterThan").with_value(21));
    assert!(!validate_group(&tree, &fields).is_valid);

    let mut renamer = FieldRenamer::new("years", "age");
    tree.accept_mut(&mut renamer);
    assert_eq!(renamer.renamed(), 1);
    assert!(validate_group(&tree, &fields).is_valid);

    let l10n = Localization::new();
    assert_eq!(
        TextRenderer::new(&fields, &l10n).render_group(&tree),
        "Age Greater than 21"
    );

    let labeled = LabeledNode::labeled(tree, &fields, &l10n);
    assert_eq!(labeled.label(), "Age Greater than 21");
}

#[test]
fn test_shared_filter_edits() {
    let fields = registry();
    let shared = SharedFilter::new(sample_tree());
    let before = shared.snapshot();

    let id = shared.write(|root| root.add_condition("name", "contains"));
    assert_eq!(shared.validate(&fields).messages(), vec!["Value is required"]);

    shared.write(|root| root.remove_descendant(&id));
    assert_eq!(shared.snapshot(), before);
    assert!(shared.validate(&fields).is_valid);
}
