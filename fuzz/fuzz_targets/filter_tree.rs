//! Fuzz target for building, editing and validating filter trees.
//!
//! This target generates arbitrary trees to find crashes and panics in
//! validation, cloning and serialization.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_filter_tree
//! ```

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use filtree_query::{
    Condition, FilterNode, FilterValue, Group, LogicalOperator, validate_group, validate_payload,
};
use filtree_schema::{DataType, FieldRegistry, FilterField};
use libfuzzer_sys::fuzz_target;

/// A fuzzable filter value.
#[derive(Debug, Arbitrary, Clone)]
enum FuzzFilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FuzzFilterValue>),
}

impl From<FuzzFilterValue> for FilterValue {
    fn from(val: FuzzFilterValue) -> Self {
        match val {
            FuzzFilterValue::Null => FilterValue::Null,
            FuzzFilterValue::Bool(b) => FilterValue::Bool(b),
            FuzzFilterValue::Int(i) => FilterValue::Int(i),
            FuzzFilterValue::Float(f) => FilterValue::Float(f),
            FuzzFilterValue::String(s) => FilterValue::String(s),
            FuzzFilterValue::List(list) => {
                FilterValue::List(list.into_iter().map(FilterValue::from).collect())
            }
        }
    }
}

/// A fuzzable node.
#[derive(Debug, Arbitrary)]
enum FuzzNode {
    Condition {
        field: String,
        operator: String,
        value: Option<FuzzFilterValue>,
    },
    Group {
        or: bool,
        children: Vec<FuzzNode>,
    },
}

impl FuzzNode {
    fn to_node(self, depth: usize) -> FilterNode {
        // Limit recursion depth to prevent stack overflow
        if depth > 10 {
            return Group::and().into();
        }

        match self {
            FuzzNode::Condition { field, operator, value } => {
                let mut condition = Condition::new(field, operator);
                if let Some(value) = value {
                    condition.set_value(value);
                }
                condition.into()
            }
            FuzzNode::Group { or, children } => {
                let operator = if or { LogicalOperator::Or } else { LogicalOperator::And };
                Group::new(operator)
                    .with_children(children.into_iter().take(10).map(|c| c.to_node(depth + 1)))
                    .into()
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(fuzz_node) = FuzzNode::arbitrary(&mut unstructured) else {
        return;
    };

    let fields = FieldRegistry::new([
        FilterField::new("name", "Name", DataType::String),
        FilterField::new("age", "Age", DataType::Number),
        FilterField::new("when", "When", DataType::Datetime),
        FilterField::new("flag", "Flag", DataType::Boolean),
    ])
    .expect("static registry");

    let root = Group::and().with_child(fuzz_node.to_node(0));

    // Typed and lenient validation agree
    let typed = validate_group(&root, &fields);
    let raw = validate_payload(&root.to_json(), &fields);
    assert_eq!(typed, raw);

    // Clones compare equal and round-trip through JSON
    let copy = root.clone();
    assert_eq!(copy, root);
    let decoded = Group::from_json(&root.to_json()).expect("encoded tree must decode");
    assert_eq!(decoded, root);
    let text = root.to_json_string().expect("encoded tree must serialize");
    assert_eq!(text.parse::<Group>().expect("encoded text must decode"), root);

    // A clone added back gets its own id
    let mut editable = root.clone();
    let copy_id = editable.add_child(copy);
    assert_ne!(copy_id, root.id());
    assert!(editable.remove_child(&copy_id).is_some());
    assert_eq!(editable, root);
});
