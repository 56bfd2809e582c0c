//! Fuzz target for the filter JSON decoder.
//!
//! Arbitrary bytes are decoded with tight limits. Decoding must either
//! fail cleanly or produce a tree that re-encodes to an equal tree.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_filter_json
//! ```

#![no_main]

use filtree_query::{FilterNode, ParseLimits, validate_payload};
use filtree_schema::{DataType, FieldRegistry, FilterField};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let limits = ParseLimits::default()
        .with_max_depth(16)
        .with_max_nodes(256)
        .with_max_payload_bytes(16 * 1024);

    if let Ok(tree) = FilterNode::parse_with(input, &limits) {
        let again = FilterNode::from_json_with(&tree.to_json(), &limits)
            .expect("re-encoded tree must decode");
        assert_eq!(again, tree);
    }

    // Lenient validation must accept any JSON value
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(input) {
        let fields = FieldRegistry::new([
            FilterField::new("a", "A", DataType::String),
            FilterField::new("b", "B", DataType::Number),
        ])
        .expect("static registry");
        let _ = validate_payload(&value, &fields);
    }
});
