//! Benchmark for cell generation performance.
//!
//! TARGET: a full 7x7 render window (49 cells) well inside one 60 Hz frame
//!
//! Run with: cargo bench --package meadow_procedural --bench cell_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use meadow_procedural::{CellCoord, CellGenerator, WorldCache, WorldConfig};

fn benchmark_single_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_cell_generation");

    for name in WorldConfig::PRESETS {
        let gen = CellGenerator::new(WorldConfig::preset(name).unwrap()).unwrap();
        group.bench_function(name, |b| {
            let mut coord = 0i32;
            b.iter(|| {
                coord = coord.wrapping_add(1);
                black_box(gen.generate(CellCoord::new(coord, coord / 2)))
            });
        });
    }

    group.finish();
}

fn benchmark_render_window(c: &mut Criterion) {
    let config = WorldConfig::woodland();
    let radius = config.render_radius;
    let side = u64::try_from(2 * radius + 1).unwrap();

    let mut group = c.benchmark_group("render_window");
    group.throughput(Throughput::Elements(side * side));
    group.bench_function("fresh_cache_ensure_around", |b| {
        let mut offset = 0i32;
        b.iter(|| {
            // New area every iteration so nothing is served from cache.
            offset = offset.wrapping_add(1000);
            let mut world = WorldCache::new(config.clone()).unwrap();
            black_box(world.ensure_around(CellCoord::new(offset, -offset), radius))
        });
    });

    group.finish();
}

fn benchmark_visible_scan(c: &mut Criterion) {
    let config = WorldConfig::woodland();
    let draw_distance = config.draw_distance();
    let mut world = WorldCache::new(config).unwrap();
    world.ensure_around(CellCoord::new(0, 0), 10);

    c.bench_function("visible_scan_441_cells", |b| {
        b.iter(|| black_box(world.visible(black_box(200.0), black_box(200.0), draw_distance).count()));
    });
}

fn benchmark_crowded_pass(c: &mut Criterion) {
    use meadow_procedural::{PathConfig, Span, TreePass, TreeVariant};

    // Far more trees than fit: measures the cost of exhausted budgets.
    let config = WorldConfig {
        tree_passes: vec![TreePass::new(
            "crowd",
            1000,
            Span::new(1.0, 1.5),
            40.0,
            &[TreeVariant::Oak],
        )],
        paths: PathConfig::disabled(),
        ..WorldConfig::woodland()
    };
    let gen = CellGenerator::new(config).unwrap();

    let mut group = c.benchmark_group("crowded_cell");
    group.sample_size(20);
    group.bench_function("1000_requested_trees", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.generate(CellCoord::new(coord, 0)))
        });
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_single_cell,
              benchmark_render_window,
              benchmark_visible_scan,
              benchmark_crowded_pass
}

criterion_main!(benches);
