//! Benchmarks for the boustrophedon decomposition pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use sweepcover::boustrophedon::{extract_cells, line_sweep, BoundaryGraph};
use sweepcover::{Decomposer, Point2};

/// Generates a star-shaped polygon with jittered angles and radii.
fn generate_star(num_points: usize, seed: u64) -> Vec<Point2<f64>> {
    let mut state = seed;
    let mut next = || {
        // Simple xorshift for deterministic jitter
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state as f64 / u64::MAX as f64
    };

    (0..num_points)
        .map(|i| {
            let angle = (i as f64 + 0.8 * next()) * std::f64::consts::TAU / num_points as f64;
            let radius = 10.0 + 20.0 * next();
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Generates a square field with a grid of square obstacles.
fn generate_field(obstacles_per_side: usize) -> BoundaryGraph {
    let side = 3.0 * obstacles_per_side as f64 + 1.0;
    let outer = [
        Point2::new(0.0, 0.0),
        Point2::new(side, 0.0),
        Point2::new(side, side),
        Point2::new(0.0, side),
    ];
    let mut holes = Vec::new();
    for i in 0..obstacles_per_side {
        for j in 0..obstacles_per_side {
            let (x, y) = (3.0 * i as f64 + 1.0, 3.0 * j as f64 + 1.0 + 0.1 * i as f64);
            holes.push(vec![
                Point2::new(x, y),
                Point2::new(x + 2.0, y),
                Point2::new(x + 2.0, y + 1.5),
                Point2::new(x, y + 1.5),
            ]);
        }
    }
    BoundaryGraph::from_loops(&outer, &holes).unwrap()
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");

    for size in [16, 64, 256] {
        let boundary = BoundaryGraph::from_loops(&generate_star(size, 42), &[]).unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("line_sweep", size), &boundary, |b, g| {
            b.iter(|| {
                let mut graph = g.clone();
                line_sweep(black_box(&mut graph), 1e-9).unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("extract_cells", size), &boundary, |b, g| {
            let mut graph = g.clone();
            let sweep = line_sweep(&mut graph, 1e-9).unwrap();
            b.iter(|| extract_cells(black_box(&graph), sweep.seeds.iter().copied()).unwrap())
        });
    }

    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    let decomposer: Decomposer = Decomposer::default();

    for size in [16, 64] {
        let boundary = BoundaryGraph::from_loops(&generate_star(size, 7), &[]).unwrap();
        group.bench_with_input(BenchmarkId::new("star", size), &boundary, |b, g| {
            b.iter(|| decomposer.decompose(black_box(g), black_box(0.3)).unwrap())
        });
    }

    for obstacles in [1, 2, 3] {
        let boundary = generate_field(obstacles);
        group.bench_with_input(
            BenchmarkId::new("field", obstacles * obstacles),
            &boundary,
            |b, g| b.iter(|| decomposer.decompose(black_box(g), black_box(0.0)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sweep, bench_decompose);
criterion_main!(benches);
