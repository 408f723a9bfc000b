//! Benchmarks for the heavy generators: cave surface scans, heightmap
//! terrain and worm tracing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use terrain_worms::{
    CaveTerrain, Heightmap, LookAtProjector, Point, RandomWorm, ScanVolume, SegmentSize,
    TerrainSettings, Vector, WormSettings, extract_surface, render_points,
};

fn cave_volume(step: f64) -> ScanVolume {
    ScanVolume::centered(Point::new(0.0, 30.0, 0.0), Vector::new(48.0, 48.0, 48.0)).with_step(step)
}

/// Full cave scan at a few step sizes.
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_cave");
    group.sample_size(10);
    let terrain = CaveTerrain::default();

    for step in [2.0, 1.5, 1.0] {
        let volume = cave_volume(step);
        group.throughput(Throughput::Elements(volume.sample_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(step), &volume, |b, volume| {
            b.iter(|| black_box(extract_surface(&terrain, volume).len()))
        });
    }

    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let points = extract_surface(&CaveTerrain::default(), &cave_volume(1.0));
    let camera = LookAtProjector::new(Point::new(0.0, 90.0, 120.0), Point::new(0.0, 30.0, 0.0));

    let mut group = c.benchmark_group("rasterize");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("cave_640x480", |b| {
        b.iter(|| black_box(render_points(640, 480, &points, &camera).width()))
    });
    group.finish();
}

fn bench_heightmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("heightmap");

    for size in [40, 80, 160] {
        let settings = TerrainSettings::default().with_grid(size, size, 2.0);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &settings, |b, settings| {
            b.iter(|| black_box(Heightmap::generate(settings).wireframe(1).len()))
        });
    }

    group.finish();
}

fn bench_worm(c: &mut Criterion) {
    let settings = WormSettings::default()
        .with_endpoints(Point::new(-30.0, -30.0, -30.0), Point::new(30.0, 30.0, 30.0))
        .with_segment_size(SegmentSize::Uniform { min: 0.5, max: 1.5 })
        .with_steps(2000);
    let worm = RandomWorm::new(settings);

    c.bench_function("worm_trace_2000", |b| b.iter(|| black_box(worm.trace().len())));
}

criterion_group!(benches, bench_extract, bench_rasterize, bench_heightmap, bench_worm);
criterion_main!(benches);
