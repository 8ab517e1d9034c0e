//! Criterion micro-benchmarks for vector-grid operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use vectra_phases::{diffuse_layer, redistribute_latent};
use vectra_space::GridGeometry;

/// Benchmark: one diffusion sub-step of a fully occupied 100×100 layer.
fn bench_diffuse_layer_10k(c: &mut Criterion) {
    let g = GridGeometry::new(0.0, 0.0, 5000.0, 100, 100).unwrap();
    let n = g.cell_count();
    let mut layer: Vec<f64> = (0..n).map(|i| 1.0 + (i % 17) as f64).collect();
    let diffusion = vec![562_500.0; n];
    let mut scratch = vec![0.0; n];

    c.bench_function("diffuse_layer_10k", |b| {
        b.iter(|| {
            diffuse_layer(&g, &mut layer, &diffusion, &mut scratch, 0.05, 1e-5);
            black_box(&layer);
        });
    });
}

/// Benchmark: ten-stage incubation redistribution.
fn bench_redistribute_latent(c: &mut Criterion) {
    let base = [4.0, 3.0, 2.5, 2.0, 1.5, 1.0, 0.8, 0.5, 0.2, 0.1];

    c.bench_function("redistribute_latent_10_stages", |b| {
        b.iter(|| {
            let mut stages = base;
            let inf = redistribute_latent(&mut stages, black_box(1.0), black_box(2.3));
            black_box((stages, inf));
        });
    });
}

criterion_group!(benches, bench_diffuse_layer_10k, bench_redistribute_latent);
criterion_main!(benches);
