#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use price_bars_wasm::application::{DataSourceAdapter, Magnitudes, RefreshLoop, SceneSession};
use price_bars_wasm::domain::errors::RenderError;
use price_bars_wasm::domain::quotes::QuoteSource;
use price_bars_wasm::domain::scene::{DataOrigin, SceneConfig, SceneKind};
use price_bars_wasm::infrastructure::http::QuoteHttpClient;
use price_bars_wasm::infrastructure::rendering::RenderSession;
use price_bars_wasm::infrastructure::ui::{UiNotificationService, fallback_element_id};
use price_bars_wasm::presentation::SceneViewer;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id(id);
    canvas.set_width(320);
    canvas.set_height(240);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn fallback_count(canvas_id: &str) -> u32 {
    let document = web_sys::window().unwrap().document().unwrap();
    document
        .query_selector_all(&format!("#{}", fallback_element_id(canvas_id)))
        .unwrap()
        .length()
}

#[wasm_bindgen_test]
fn fallback_is_shown_once() {
    let canvas = mount_canvas("fallback-once");
    let ui = UiNotificationService::new();
    ui.show_fallback(&canvas).unwrap();
    ui.show_fallback(&canvas).unwrap();

    assert_eq!(fallback_count("fallback-once"), 1);
    assert!(canvas.get_attribute("style").unwrap().contains("display: none"));
}

#[wasm_bindgen_test]
async fn session_runs_or_falls_back() {
    let canvas = mount_canvas("bars-session");
    let result = SceneSession::start(canvas, SceneKind::Bars, SceneConfig::default()).await;

    if RenderSession::is_webgpu_supported() && result.is_ok() {
        let mut session = result.unwrap();
        assert!(session.is_running());
        TimeoutFuture::new(250).await;

        let info: serde_json::Value = serde_json::from_str(&session.performance_info()).unwrap();
        assert!(info["frames_submitted"].as_u64().unwrap() > 0);

        session.stop();
        assert!(!session.is_running());
    } else {
        assert!(matches!(result, Err(RenderError::UnsupportedDevice(_))));
        assert_eq!(fallback_count("bars-session"), 1);
    }
}

#[wasm_bindgen_test]
async fn resize_is_idempotent() {
    if !RenderSession::is_webgpu_supported() {
        return;
    }
    let canvas = mount_canvas("resize-session");
    let Ok(mut session) = RenderSession::new(canvas).await else {
        return;
    };

    assert!(session.resize(640, 480));
    let generation = session.render_target().generation();
    assert!(!session.resize(640, 480));
    assert!(!session.resize(0, 480));
    assert_eq!(session.render_target().generation(), generation);
}

#[wasm_bindgen_test]
async fn viewer_rejects_unknown_scene() {
    mount_canvas("viewer-unknown");
    let viewer = SceneViewer::new("viewer-unknown".to_string());
    let result = JsFuture::from(viewer.start("sphere".to_string(), wasm_bindgen::JsValue::UNDEFINED)).await;
    assert!(result.is_err());
    assert!(!viewer.is_running());
    assert_eq!(viewer.performance_info(), "{}");
}

#[wasm_bindgen_test]
async fn viewer_rejects_missing_canvas() {
    let viewer = SceneViewer::new("no-such-canvas".to_string());
    let result = JsFuture::from(viewer.start("cube".to_string(), wasm_bindgen::JsValue::NULL)).await;
    assert!(result.is_err());
}

// TEST-NET-1 is reserved and never answers, so only the timer can settle it.
const SILENT_URL: &str = "http://192.0.2.1/quote.json";

#[wasm_bindgen_test]
async fn fetch_times_out_as_data_failure() {
    let client = QuoteHttpClient::new(SILENT_URL, "/bpi/USD/rate", 0);
    let result = client.fetch_rate().await;
    assert!(matches!(result, Err(RenderError::DataFetchFailure(_))));
}

#[wasm_bindgen_test]
async fn timed_out_fetch_yields_full_synthetic_row() {
    let client = QuoteHttpClient::new(SILENT_URL, "/bpi/USD/rate", 0);
    let adapter = DataSourceAdapter::new(client, 12);

    let magnitudes = adapter.fetch_magnitudes().await;
    assert_eq!(magnitudes.origin, DataOrigin::Synthetic);
    assert_eq!(magnitudes.values.len(), 12);
}

#[wasm_bindgen_test]
async fn shape_mismatch_stops_the_refresh_loop() {
    let client = QuoteHttpClient::new(SILENT_URL, "/bpi/USD/rate", 0);
    let adapter = Rc::new(DataSourceAdapter::new(client, 3));
    let deliveries = Rc::new(Cell::new(0u32));

    let counter = Rc::clone(&deliveries);
    let refresh = RefreshLoop::start(adapter, 20, move |magnitudes: Magnitudes| {
        counter.set(counter.get() + 1);
        Err(RenderError::ShapeMismatch { expected: 12, actual: magnitudes.values.len() })
    });

    TimeoutFuture::new(200).await;
    assert!(refresh.is_halted());
    assert_eq!(deliveries.get(), 1);
}
