use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlchain::prelude::*;
use sqlchain::SelectQb;

/// SELECT col0, col1, ... FROM t WHERE (col0 = 0) AND (col1 = 1) ...
fn build_select(n: usize) -> SelectQb {
    let mut qb = select_from("t");
    for i in 0..n {
        qb = qb.column(format!("col{i}")).eq(format!("col{i}"), i as i64);
    }
    qb
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_parameterized(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_numbered");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n).numbered();
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.build()));
        });
    }

    group.finish();
}

fn bench_nested_subqueries(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested_in");

    for depth in [1, 4, 16] {
        let mut qb = select(["id"]).from("t0").eq("k", 0);
        for d in 1..=depth {
            qb = select(["id"])
                .from(format!("t{d}"))
                .eq("k", d as i64)
                .in_list("id", qb);
        }
        let qb = qb.parameterized();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &qb, |b, qb| {
            b.iter(|| black_box(qb.render()));
        });
    }

    group.finish();
}

fn bench_insert_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_rows");

    for n in [10, 100, 1000] {
        let rows: Vec<Vec<Value>> = (0..n).map(|i| row![i, format!("user{i}"), i % 2 == 0]).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| {
                let qb = insert_into("users")
                    .fields(["id", "name", "active"])
                    .values(rows.iter().cloned())
                    .parameterized();
                black_box(qb.build())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_to_sql,
    bench_build_parameterized,
    bench_nested_subqueries,
    bench_insert_rows
);
criterion_main!(benches);
