use std::time::Duration;

use archigraph::{
    ChainDeriver, SqliteGraph, SqliteGraphBackend, StrengthTable,
    bench_utils::{ChainShape, generate_chain},
};
use criterion::{Criterion, criterion_group, criterion_main};

const CHAIN_SEED: u64 = 0xA7C1;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

struct PreparedChain {
    backend: SqliteGraphBackend,
    chain: Vec<i64>,
    label: &'static str,
}

fn chain_length() -> usize {
    #[cfg(feature = "bench-ci")]
    {
        200
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        2_000
    }
}

fn prepared_chains() -> Vec<PreparedChain> {
    let length = chain_length();
    vec![
        prepare(
            ChainShape {
                length,
                parallel: 1,
                noise: 0,
                detours: 0,
            },
            "single",
        ),
        prepare(
            ChainShape {
                length,
                parallel: 4,
                noise: 2,
                detours: 3,
            },
            "dense",
        ),
    ]
}

fn prepare(shape: ChainShape, label: &'static str) -> PreparedChain {
    let dataset = generate_chain(&shape, CHAIN_SEED);
    let graph = SqliteGraph::open_in_memory().expect("graph");
    let chain = dataset.materialize(&graph).expect("materialize");
    PreparedChain {
        backend: SqliteGraphBackend::from_graph(graph),
        chain,
        label,
    }
}

fn bench_derive(c: &mut Criterion) {
    let chains = prepared_chains();
    let table = StrengthTable::archimate();
    let mut group = c.benchmark_group("derive");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for prepared in &chains {
        let deriver = ChainDeriver::new(&prepared.backend, &table);
        group.bench_function(prepared.label, |b| {
            b.iter(|| deriver.derive(&prepared.chain).expect("derive"));
        });
    }
    group.finish();
}

fn bench_weakest_edge(c: &mut Criterion) {
    let chains = prepared_chains();
    let table = StrengthTable::archimate();
    let mut group = c.benchmark_group("weakest_edge_to");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for prepared in &chains {
        let deriver = ChainDeriver::new(&prepared.backend, &table);
        let (source, target) = (prepared.chain[0], prepared.chain[1]);
        group.bench_function(prepared.label, |b| {
            b.iter(|| deriver.weakest_edge_to(source, target).expect("weakest"));
        });
    }
    group.finish();
}

criterion_group!(
    name = derive_benches;
    config = Criterion::default();
    targets = bench_derive, bench_weakest_edge
);
criterion_main!(derive_benches);
