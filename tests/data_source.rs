use futures::FutureExt;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use price_bars_wasm::application::data_source::{
    DataSourceAdapter, InFlightGuard, LIVE_NOISE, SYNTHETIC_MAX, halts_refresh,
};
use price_bars_wasm::domain::errors::{RenderError, RenderResult};
use price_bars_wasm::domain::instances::{InstanceDataBinder, InstanceStaging};
use price_bars_wasm::domain::quotes::{QuoteSource, parse_quote_rate};
use price_bars_wasm::domain::scene::DataOrigin;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

struct Offline;

impl QuoteSource for Offline {
    fn fetch_rate(&self) -> LocalBoxFuture<'_, RenderResult<f64>> {
        async { Err(RenderError::DataFetchFailure("offline".to_string())) }.boxed_local()
    }
}

struct Fixed(f64);

impl QuoteSource for Fixed {
    fn fetch_rate(&self) -> LocalBoxFuture<'_, RenderResult<f64>> {
        let rate = self.0;
        async move { Ok(rate) }.boxed_local()
    }
}

#[test]
fn failed_fetch_falls_back_to_synthetic_values() {
    let adapter = DataSourceAdapter::with_rng(Offline, 12, StdRng::seed_from_u64(7));
    let magnitudes = block_on(adapter.fetch_magnitudes());

    assert_eq!(magnitudes.origin, DataOrigin::Synthetic);
    assert_eq!(magnitudes.values.len(), 12);
    assert!(magnitudes.values.iter().all(|v| (0.0..SYNTHETIC_MAX).contains(v)));

    let mut staging = InstanceStaging::bar_row(12, 0.1, 0.07);
    InstanceDataBinder::new(12).bind(&mut staging, &magnitudes.values).unwrap();
}

#[test]
fn live_rate_is_perturbed_per_bar() {
    let adapter = DataSourceAdapter::with_rng(Fixed(43_281.5), 12, StdRng::seed_from_u64(7));
    let magnitudes = block_on(adapter.fetch_magnitudes());

    assert_eq!(magnitudes.origin, DataOrigin::Live);
    assert_eq!(magnitudes.values.len(), 12);
    for value in &magnitudes.values {
        let factor = value / 43_281.5;
        assert!(LIVE_NOISE.contains(&factor), "factor {factor} outside noise band");
    }
    let first = magnitudes.values[0];
    assert!(magnitudes.values.iter().any(|v| *v != first));
}

#[test]
fn every_refresh_draws_fresh_values() {
    let adapter = DataSourceAdapter::with_rng(Offline, 4, StdRng::seed_from_u64(1));
    let first = block_on(adapter.fetch_magnitudes());
    let second = block_on(adapter.fetch_magnitudes());
    assert_ne!(first.values, second.values);
}

#[test]
fn in_flight_guard_admits_one_refresh() {
    let guard = InFlightGuard::new();
    let token = guard.try_acquire().unwrap();
    assert!(guard.is_busy());
    assert!(guard.clone().try_acquire().is_none());

    drop(token);
    assert!(!guard.is_busy());
    assert!(guard.try_acquire().is_some());
}

#[test]
fn quote_rate_parses_grouped_decimal() {
    let body = json!({ "bpi": { "USD": { "rate": "43,281.5123" } } });
    let rate = parse_quote_rate(&body, "/bpi/USD/rate").unwrap();
    assert!((rate - 43_281.5123).abs() < 1e-9);
}

#[test]
fn quote_rate_rejects_bad_payloads() {
    let cases = [
        json!({}),
        json!({ "bpi": { "USD": { "rate": 43281.5 } } }),
        json!({ "bpi": { "USD": { "rate": "n/a" } } }),
        json!({ "bpi": { "USD": { "rate": "-5" } } }),
    ];
    for body in cases {
        assert!(matches!(
            parse_quote_rate(&body, "/bpi/USD/rate"),
            Err(RenderError::DataFetchFailure(_))
        ));
    }
}

#[test]
fn only_shape_mismatch_stops_refreshing() {
    let mut staging = InstanceStaging::bar_row(12, 0.1, 0.07);
    let mismatch = InstanceDataBinder::new(12).bind(&mut staging, &[1.0; 5]).unwrap_err();

    assert!(halts_refresh(&mismatch));
    assert!(!halts_refresh(&RenderError::DataFetchFailure("timeout".to_string())));
    assert!(!halts_refresh(&RenderError::NotProvisioned("instance buffer")));
}
