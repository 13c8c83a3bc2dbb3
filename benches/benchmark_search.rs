use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use ghd_search::config::{Algorithm, Parallelism, SearchConfig};
use ghd_search::edge::{Edge, EdgeSet};
use ghd_search::engine;
use ghd_search::graph::Graph;

fn grid_edges(side: u32) -> EdgeSet {
    let coords = |r: u32, c: u32| r * side + c;
    let mut edges = Vec::new();
    let mut name = 1;
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                edges.push(Edge::new(name, vec![coords(r, c), coords(r, c + 1)]));
                name += 1;
            }
            if r + 1 < side {
                edges.push(Edge::new(name, vec![coords(r, c), coords(r + 1, c)]));
                name += 1;
            }
        }
    }
    EdgeSet::new(edges)
}

fn bench_balsep_parallelism(c: &mut Criterion) {
    let mut group = c.benchmark_group("balsep grid search");
    group.sample_size(20);

    for parallelism in [Parallelism::Sequential, Parallelism::Full] {
        let label = format!("{parallelism:?}");
        group.bench_function(label, |b| {
            b.iter(|| {
                let graph = Graph::new(grid_edges(4), Vec::new());
                let config = SearchConfig::new(2, Algorithm::BalSep).with_parallelism(parallelism);
                let built = engine::build(graph, &config);
                black_box(built.find_decomp(&config))
            })
        });
    }
}

fn bench_algorithm_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("algorithm comparison on a 3x3 grid");

    for algorithm in [Algorithm::BalSep, Algorithm::DetK, Algorithm::LogK] {
        let label = format!("{algorithm:?}");
        group.bench_function(label, |b| {
            b.iter(|| {
                let graph = Graph::new(grid_edges(3), Vec::new());
                let config = SearchConfig::new(2, algorithm).with_parallelism(Parallelism::Search);
                let built = engine::build(graph, &config);
                black_box(built.find_decomp(&config))
            })
        });
    }
}

criterion_group!(benches, bench_balsep_parallelism, bench_algorithm_comparison);
criterion_main!(benches);
