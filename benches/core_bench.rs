use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use portfolio_lanyard::shared::spline_geometry::catmull_rom_curve;
use portfolio_lanyard::{AppController, AppIntent, AppState, SplineParameterization};
use std::hint::black_box;

fn build_control_points() -> [Vec3; 4] {
    [
        Vec3::new(0.3, 1.2, 0.0),
        Vec3::new(0.2, 2.1, 0.05),
        Vec3::new(0.1, 3.0, 0.02),
        Vec3::new(0.0, 4.0, 0.0),
    ]
}

fn bench_curve_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("catmull_rom_curve");
    let points = build_control_points();

    for &samples in &[32usize, 128usize] {
        group.bench_with_input(
            BenchmarkId::new("chordal", samples),
            &samples,
            |b, &samples| {
                b.iter(|| {
                    let curve = catmull_rom_curve(
                        black_box(&points),
                        samples,
                        SplineParameterization::Chordal,
                    );
                    black_box(curve.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_frame_pipeline(c: &mut Criterion) {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    controller
        .handle_intent(&mut state, AppIntent::SceneMounted)
        .expect("Mount fehlgeschlagen");

    c.bench_function("frame_pipeline_60hz", |b| {
        b.iter(|| {
            controller
                .handle_intent(&mut state, AppIntent::FrameRequested { dt: 1.0 / 60.0 })
                .expect("Frame fehlgeschlagen");
            black_box(state.scene.height)
        })
    });
}

criterion_group!(benches, bench_curve_builder, bench_frame_pipeline);
criterion_main!(benches);
