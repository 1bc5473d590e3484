//! Pure rendering-engine logic: matrices, geometry tables, instance layout,
//! camera motion and scene configuration.
//!
//! Nothing in here talks to the browser or the GPU, so every module builds and
//! tests on the host target as well as on `wasm32`.

pub mod camera;
pub mod errors;
pub mod geometry;
pub mod instances;
pub mod logging;
pub mod math;
pub mod quotes;
pub mod scene;

pub use camera::{CameraMotion, CameraRig};
pub use errors::{RenderError, RenderResult};
pub use instances::{InstanceDataBinder, InstanceRecord, InstanceStaging};
pub use quotes::QuoteSource;
pub use scene::{DataOrigin, DeviceStatus, SceneConfig, SceneKind};
