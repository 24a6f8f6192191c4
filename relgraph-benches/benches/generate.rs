//! Random graph generator benchmarks.
//!
//! Measures each edge-placement policy growing an empty edge set over a
//! fresh node list. The preferential policy dominates because every
//! accepted edge refreshes two sampler weights.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use relgraph_benches::{fixtures::SEED, params::GraphBenchParams};
use relgraph_core::{
    Graph,
    generate::{connect_completely, connect_preferentially, connect_randomly, constant},
};

/// Node counts to benchmark.
const NODE_COUNTS: &[u32] = &[100, 500, 2_000];

/// Edges placed per node by the sampling policies.
const DENSITY: u64 = 8;

fn nodes(count: u32) -> Graph<u64, ()> {
    Graph::from_node_values(0..u64::from(count))
}

fn bench_sampling_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    for &node_count in NODE_COUNTS {
        let params = GraphBenchParams::with_density(node_count, DENSITY);

        group.bench_with_input(
            BenchmarkId::new("random", &params),
            &params,
            |b, params| {
                let mut rng = SmallRng::seed_from_u64(SEED);
                b.iter_batched(
                    || nodes(params.node_count),
                    |mut graph| {
                        connect_randomly(&mut graph, params.edge_count, constant(()), &mut rng)
                    },
                    BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("preferential", &params),
            &params,
            |b, params| {
                let mut rng = SmallRng::seed_from_u64(SEED);
                b.iter_batched(
                    || nodes(params.node_count),
                    |mut graph| {
                        connect_preferentially(&mut graph, params.edge_count, constant(()), &mut rng)
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_complete");
    group.sample_size(10);

    for &node_count in &[50_u32, 200] {
        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            &node_count,
            |b, &node_count| {
                b.iter_batched(
                    || nodes(node_count),
                    |mut graph| connect_completely(&mut graph, constant(())),
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sampling_policies, bench_complete);
criterion_main!(benches);
