use price_bars_wasm::infrastructure::rendering::{FrameStats, RenderTargetState};

#[test]
fn resizing_to_the_same_size_is_a_no_op() {
    let target = RenderTargetState::new(800, 600);
    assert!(!target.needs_resize(800, 600));

    let resized = target.resized(1024, 768);
    assert_eq!(resized.generation(), target.generation() + 1);
    assert!(!resized.needs_resize(1024, 768));
    assert!(resized.needs_resize(800, 600));
}

#[test]
fn zero_dimensions_are_clamped() {
    let target = RenderTargetState::new(0, 0);
    assert_eq!((target.width(), target.height()), (1, 1));
    assert_eq!(target.aspect(), 1.0);
}

#[test]
fn aspect_follows_the_surface() {
    assert_eq!(RenderTargetState::new(1600, 800).aspect(), 2.0);
}

#[test]
fn stats_serialize_counters() {
    let mut stats = FrameStats::new();
    stats.record_frame(0.0);
    stats.record_frame(20.0);
    stats.record_skip();

    let info: serde_json::Value = serde_json::from_str(&stats.to_json()).unwrap();
    assert_eq!(info["frames_submitted"], 2);
    assert_eq!(info["frames_skipped"], 1);
    assert_eq!(info["avg_fps"], 50.0);
    assert_eq!(info["backend"], "WebGPU");
}
