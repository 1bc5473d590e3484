use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use price_bars_wasm::application::FrameScheduler;
use price_bars_wasm::domain::{
    camera::CameraRig,
    instances::{InstanceDataBinder, InstanceStaging},
    scene::{SceneConfig, SceneKind},
};
use std::time::Duration;

/// Deterministic magnitudes resembling a perturbed quote.
fn magnitudes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 43_000.0 * (1.0 + 0.2 * (i as f64 * 0.7).sin())).collect()
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("instance_binding");
    group.measurement_time(Duration::from_secs(5));

    for count in [12, 256, 4096] {
        let values = magnitudes(count);
        let binder = InstanceDataBinder::new(count);
        let mut staging = InstanceStaging::bar_row(count, 0.1, 0.07);

        group.bench_with_input(BenchmarkId::new("bind_and_drain", count), &values, |b, values| {
            b.iter(|| {
                binder.bind(&mut staging, black_box(values)).unwrap();
                black_box(staging.take_dirty().map(|(start, records)| start + records.len()));
            })
        });
    }

    group.finish();
}

fn bench_frame_plan(c: &mut Criterion) {
    let config = SceneConfig::default();
    let mut scheduler = FrameScheduler::new(CameraRig::for_scene(SceneKind::Bars, &config), 12);
    let mut timestamp = 0.0;

    c.bench_function("plan_frame", |b| {
        b.iter(|| {
            timestamp += 16.6;
            black_box(scheduler.plan_frame(timestamp, (1920, 1080)));
        })
    });
}

criterion_group!(benches, bench_bind, bench_frame_plan);
criterion_main!(benches);
