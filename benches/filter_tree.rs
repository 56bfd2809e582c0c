//! Benchmarks for validation, cloning and serialization of filter trees.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use filtree::prelude::*;
use filtree::query::{ConditionCollector, Localization, TextRenderer};

fn registry() -> FieldRegistry {
    FieldRegistry::new([
        FilterField::new("id", "Id", DataType::Number),
        FilterField::new("name", "Name", DataType::String),
        FilterField::new("created", "Created", DataType::Date),
        FilterField::new("active", "Active", DataType::Boolean),
    ])
    .unwrap_or_else(|_| FieldRegistry::empty())
}

/// Create a flat AND group with `count` conditions.
fn create_flat_group(count: usize) -> Group {
    Group::and().with_children((0..count).map(|i| match i % 4 {
        0 => Condition::new("id", "greaterThan").with_value(i as i64),
        1 => Condition::new("name", "contains").with_value(format!("name_{}", i)),
        2 => Condition::new("created", "between").with_value(vec!["2024-01-01", "2024-12-31"]),
        _ => Condition::new("active", "equals").with_value(i % 2 == 0),
    }))
}

/// Create a tree that alternates AND/OR groups down to `depth`.
fn create_nested_group(depth: usize) -> Group {
    let mut group = Group::or()
        .with_child(Condition::new("id", "equals").with_value(depth as i64))
        .with_child(Condition::new("name", "isBlank"));
    for level in 0..depth {
        let operator = if level % 2 == 0 {
            LogicalOperator::And
        } else {
            LogicalOperator::Or
        };
        group = Group::new(operator)
            .with_child(Condition::new("id", "lessThan").with_value(level as i64))
            .with_child(group);
    }
    group
}

fn bench_validation(c: &mut Criterion) {
    let fields = registry();
    let mut group = c.benchmark_group("validation");

    for size in [10, 100, 1000] {
        let tree = create_flat_group(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("flat", size), &tree, |b, tree| {
            b.iter(|| validate_group(black_box(tree), &fields))
        });
    }

    for depth in [5, 20] {
        let tree = create_nested_group(depth);
        group.bench_with_input(BenchmarkId::new("nested", depth), &tree, |b, tree| {
            b.iter(|| validate_group(black_box(tree), &fields))
        });
    }

    group.finish();
}

fn bench_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone");

    for size in [10, 100, 1000] {
        let tree = FilterNode::from(create_flat_group(size));
        group.bench_with_input(BenchmarkId::new("snapshot", size), &tree, |b, tree| {
            b.iter(|| black_box(tree).clone())
        });
        group.bench_with_input(BenchmarkId::new("duplicate", size), &tree, |b, tree| {
            b.iter(|| black_box(tree).duplicate())
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    for size in [10, 100, 500] {
        let tree = create_flat_group(size);
        let text = tree.to_json_string().unwrap_or_default();

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &tree, |b, tree| {
            b.iter(|| black_box(tree).to_json_string())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &text, |b, text| {
            b.iter(|| Group::parse_with(black_box(text), &ParseLimits::unlimited()))
        });
    }

    group.finish();
}

fn bench_visitors(c: &mut Criterion) {
    let fields = registry();
    let l10n = Localization::new();
    let tree = create_nested_group(20);
    let mut group = c.benchmark_group("visitors");

    group.bench_function("collect_conditions", |b| {
        b.iter(|| {
            let mut collector = ConditionCollector::new(|c: &Condition| c.field() == "id");
            black_box(&tree).accept(&mut collector);
            collector.into_matches()
        })
    });
    group.bench_function("render_text", |b| {
        b.iter(|| TextRenderer::new(&fields, &l10n).render_group(black_box(&tree)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_validation,
    bench_clone,
    bench_serialization,
    bench_visitors
);
criterion_main!(benches);
