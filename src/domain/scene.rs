use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use std::str::FromStr;

use super::errors::{RenderError, RenderResult};
use super::logging::LogLevel;
use super::math::{self, Vec3};

/// Which scene a viewer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// One colored cube spinning in front of a fixed camera.
    Cube,
    /// A row of instanced bars seen from an orbiting camera.
    Bars,
}

/// GPU availability as last observed by a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DeviceStatus {
    Probing,
    Ready,
    Unsupported,
}

/// Where the most recent magnitudes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataOrigin {
    Pending,
    Live,
    Synthetic,
}

/// Tunables for a scene. Every field has a default, so hosts only pass
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub bar_count: usize,
    pub bar_spacing: f32,
    pub bar_footprint: f32,

    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,

    pub orbit_radius: f32,
    pub orbit_height: f32,
    pub orbit_target: Vec3,
    /// Radians added to the orbit angle each frame.
    pub orbit_step: f32,

    pub spin_eye: Vec3,
    pub spin_axis: Vec3,
    /// Radians per second.
    pub spin_rate: f32,

    pub clear_color: [f64; 4],

    pub refresh_interval_ms: u32,
    pub fetch_timeout_ms: u32,
    pub quote_url: String,
    /// JSON pointer to the textual rate inside the quote response.
    pub rate_pointer: String,

    pub log_level: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bar_count: 12,
            bar_spacing: 0.1,
            bar_footprint: 0.07,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            orbit_radius: 2.0,
            orbit_height: 1.2,
            orbit_target: [0.0, 0.4, 0.0],
            orbit_step: 0.005,
            spin_eye: [0.0, 1.5, 3.0],
            spin_axis: [0.5, 1.0, 0.0],
            spin_rate: 1.0,
            clear_color: [0.08, 0.09, 0.12, 1.0],
            refresh_interval_ms: 15_000,
            fetch_timeout_ms: 10_000,
            quote_url: "https://api.coindesk.com/v1/bpi/currentprice.json".to_string(),
            rate_pointer: "/bpi/USD/rate".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl SceneConfig {
    /// Defaults overridden by the fields present in `json`, then validated.
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RenderError::InvalidConfig(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: &str| Err(RenderError::InvalidConfig(msg.to_string()));

        if self.bar_count == 0 {
            return invalid("barCount must be positive");
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return invalid("clip planes must satisfy 0 < near < far");
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return invalid("fovYDegrees must be in (0, 180)");
        }
        if self.refresh_interval_ms == 0 {
            return invalid("refreshIntervalMs must be positive");
        }
        if math::length(self.spin_axis) <= f32::EPSILON {
            return invalid("spinAxis must be non-zero");
        }
        if math::length(math::cross(self.spin_eye, [0.0, 1.0, 0.0])) <= f32::EPSILON {
            return invalid("spinEye must not lie on the vertical axis through the cube");
        }
        if self.orbit_radius <= 0.0 {
            return invalid("orbitRadius must be positive");
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> RenderResult<LogLevel> {
        LogLevel::from_str(&self.log_level)
            .map_err(|_| RenderError::InvalidConfig(format!("unknown logLevel '{}'", self.log_level)))
    }

    pub fn fov_y_radians(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }

    /// Number of instances drawn per frame for `kind`.
    pub fn instance_count(&self, kind: SceneKind) -> usize {
        match kind {
            SceneKind::Cube => 1,
            SceneKind::Bars => self.bar_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(SceneKind::from_str("Bars").unwrap(), SceneKind::Bars);
        assert_eq!(SceneKind::Cube.to_string(), "cube");
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }
}
