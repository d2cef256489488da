use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use pliant::{BaseHandle, MatchClause};

fn build_clause(field_count: usize) -> MatchClause {
    let clause = MatchClause::new(&BaseHandle::new());
    for i in 0..field_count {
        let field = format!("field_{}", i);
        clause.matching(json!({ field: "value" })).unwrap();
        let negated = format!("negated_{}", i);
        clause.not_matching(json!({ negated: "value" })).unwrap();
    }
    clause
}

fn bench_chained_registration(c: &mut Criterion) {
    let counts = [4usize, 16, 64];

    let mut group = c.benchmark_group("chained_registration");
    for &count in &counts {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                black_box(build_clause(count).any());
            });
        });
    }
    group.finish();
}

fn bench_compile_and_render(c: &mut Criterion) {
    let counts = [4usize, 16, 64];
    let clauses: Vec<(usize, MatchClause)> = counts
        .iter()
        .map(|&count| (count, build_clause(count)))
        .collect();

    let mut group = c.benchmark_group("compile_and_render");
    for (count, clause) in clauses.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), clause, |b, clause| {
            b.iter(|| {
                let boost = clause.to_boost().unwrap();
                black_box(boost.to_json());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chained_registration, bench_compile_and_render);
criterion_main!(benches);
