#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tmskb::{KnowledgeBase, Statement, Term};

fn edge(from: usize, to: usize) -> Statement {
    Statement::new(
        "edge",
        [Term::Symbol(format!("n{from}")), Term::Symbol(format!("n{to}"))],
    )
}

fn add_path_rules(kb: &mut KnowledgeBase) {
    // path(x, y) <- edge(x, y)
    kb.assert_rule(
        [Statement::new("edge", [Term::var("x"), Term::var("y")])],
        Statement::new("path", [Term::var("x"), Term::var("y")]),
    )
    .unwrap();

    // path(x, z) <- path(x, y), edge(y, z)
    kb.assert_rule(
        [
            Statement::new("path", [Term::var("x"), Term::var("y")]),
            Statement::new("edge", [Term::var("y"), Term::var("z")]),
        ],
        Statement::new("path", [Term::var("x"), Term::var("z")]),
    )
    .unwrap();
}

/// Benchmark for asserting facts with no rules to chain through
fn bench_assert_facts(c: &mut Criterion) {
    c.bench_function("assert_facts", |b| {
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            for i in 0..1000 {
                kb.assert_fact(black_box(edge(i, i + 1))).unwrap();
            }
            black_box(kb)
        });
    });
}

/// Benchmark for a single one-antecedent rule over existing facts
fn bench_simple_rule(c: &mut Criterion) {
    c.bench_function("simple_rule", |b| {
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            for i in 0..100 {
                kb.assert_fact(edge(i, i + 1)).unwrap();
            }
            kb.assert_rule(
                [Statement::new("edge", [Term::var("x"), Term::var("y")])],
                Statement::new("path", [Term::var("x"), Term::var("y")]),
            )
            .unwrap();
            black_box(kb.fact_count())
        });
    });
}

/// Benchmark for transitive closure over a linear chain
fn bench_transitive_closure(c: &mut Criterion) {
    c.bench_function("transitive_closure", |b| {
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            add_path_rules(&mut kb);
            for i in 0..30 {
                kb.assert_fact(edge(i, i + 1)).unwrap();
            }
            black_box(kb.fact_count())
        });
    });
}

/// Benchmark for re-asserting facts that are already stored
fn bench_reassert(c: &mut Criterion) {
    let mut kb = KnowledgeBase::new();
    add_path_rules(&mut kb);
    for i in 0..30 {
        kb.assert_fact(edge(i, i + 1)).unwrap();
    }

    c.bench_function("reassert", |b| {
        b.iter(|| {
            for i in 0..30 {
                kb.assert_fact(black_box(edge(i, i + 1))).unwrap();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_assert_facts,
    bench_simple_rule,
    bench_transitive_closure,
    bench_reassert
);
criterion_main!(benches);
