use price_bars_wasm::domain::errors::RenderError;
use price_bars_wasm::domain::logging::LogLevel;
use price_bars_wasm::domain::scene::{SceneConfig, SceneKind};
use std::str::FromStr;

#[test]
fn empty_json_is_the_default() {
    assert_eq!(SceneConfig::from_json_str("{}").unwrap(), SceneConfig::default());
}

#[test]
fn defaults_describe_twelve_bars_refreshed_every_fifteen_seconds() {
    let config = SceneConfig::default();
    assert_eq!(config.bar_count, 12);
    assert_eq!(config.refresh_interval_ms, 15_000);
    assert_eq!(config.rate_pointer, "/bpi/USD/rate");
    assert_eq!(config.instance_count(SceneKind::Bars), 12);
    assert_eq!(config.instance_count(SceneKind::Cube), 1);
    config.validate().unwrap();
}

#[test]
fn camel_case_overrides_apply() {
    let config =
        SceneConfig::from_json_str(r#"{ "barCount": 20, "refreshIntervalMs": 5000, "logLevel": "warn" }"#)
            .unwrap();
    assert_eq!(config.bar_count, 20);
    assert_eq!(config.refresh_interval_ms, 5000);
    assert_eq!(config.log_level().unwrap(), LogLevel::Warn);
    assert_eq!(config.far, SceneConfig::default().far);
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        r#"{ "barCount": 0 }"#,
        r#"{ "near": 10.0, "far": 1.0 }"#,
        r#"{ "fovYDegrees": 180.0 }"#,
        r#"{ "refreshIntervalMs": 0 }"#,
        r#"{ "spinAxis": [0.0, 0.0, 0.0] }"#,
        r#"{ "spinEye": [0.0, 4.0, 0.0] }"#,
        r#"{ "orbitRadius": 0.0 }"#,
        r#"{ "logLevel": "loud" }"#,
    ];
    for json in cases {
        assert!(
            matches!(SceneConfig::from_json_str(json), Err(RenderError::InvalidConfig(_))),
            "{json} should be rejected"
        );
    }
}

#[test]
fn malformed_json_is_invalid_config() {
    assert!(matches!(
        SceneConfig::from_json_str("{ barCount: "),
        Err(RenderError::InvalidConfig(_))
    ));
}

#[test]
fn scene_kind_round_trips_through_text() {
    assert_eq!(SceneKind::from_str("Bars").unwrap(), SceneKind::Bars);
    assert_eq!(SceneKind::Cube.to_string(), "cube");
    assert!(SceneKind::from_str("sphere").is_err());
}
