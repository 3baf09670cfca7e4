//! Reduction and completion benchmarks using Criterion.
//!
//! Run with: `cargo bench`
//!
//! Measures both reduction strategies against a commuting algebra of
//! growing size, and completion of a small non-confluent rule set.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use opalg::precontext::AlgebraicPrecontext;
use opalg::rulebook::OperatorRulebook;
use opalg::sequence::{HashedSequence, OperName};
use opalg::sign::SequenceSignType;

/// Rulebook sorting products of `operators` commuting generators.
fn commuting_rulebook(operators: usize) -> OperatorRulebook {
    let pc = AlgebraicPrecontext::self_adjoint(operators).unwrap();
    let rules = OperatorRulebook::commutator_rules(&pc);
    OperatorRulebook::with_rules(pc, rules, true)
}

/// Reverse-sorted string of length `len`: the worst case for sorting rules.
fn descending(rulebook: &OperatorRulebook, len: usize) -> HashedSequence {
    let n = rulebook.precontext().num_operators() as OperName;
    let ops: Vec<OperName> = (0..len as OperName).map(|i| n - 1 - (i % n)).collect();
    rulebook
        .precontext()
        .sequence(&ops, SequenceSignType::Positive)
        .unwrap()
}

fn bench_reduce_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    for operators in [4usize, 8, 16] {
        let rulebook = commuting_rulebook(operators);
        let input = descending(&rulebook, 8);

        group.bench_with_input(
            BenchmarkId::new("iterate", operators),
            &input,
            |b, input| b.iter(|| rulebook.reduce_via_iteration(black_box(input))),
        );
        group.bench_with_input(
            BenchmarkId::new("search", operators),
            &input,
            |b, input| b.iter(|| rulebook.reduce_via_search(black_box(input))),
        );
        group.bench_with_input(
            BenchmarkId::new("automatic", operators),
            &input,
            |b, input| b.iter(|| rulebook.reduce(black_box(input))),
        );
    }
    group.finish();
}

fn bench_complete(c: &mut Criterion) {
    let pc = AlgebraicPrecontext::self_adjoint(2).unwrap();
    let rules = vec![
        pc.rule(&[0, 0, 0], &[], SequenceSignType::Positive).unwrap(),
        pc.rule(&[1, 1], &[], SequenceSignType::Positive).unwrap(),
        pc.rule(&[1, 0, 1], &[0, 0], SequenceSignType::Positive).unwrap(),
    ];

    c.bench_function("complete_s3_presentation", |b| {
        b.iter(|| {
            let mut rulebook = OperatorRulebook::with_rules(pc.clone(), rules.clone(), false);
            black_box(rulebook.complete(32, None))
        })
    });
}

criterion_group!(benches, bench_reduce_strategies, bench_complete);
criterion_main!(benches);
