pub mod gpu_structures;
pub mod renderer;

pub use gpu_structures::*;
pub use renderer::{DEPTH_FORMAT, FrameOutcome, FrameStats, RenderTargetState};
#[cfg(target_arch = "wasm32")]
pub use renderer::RenderSession;

/// WGSL for the instanced bar chart (position-only mesh).
pub const BARS_SHADER: &str = include_str!("shaders/bars.wgsl");
/// WGSL for the rotating cube (position + color mesh).
pub const CUBE_SHADER: &str = include_str!("shaders/cube.wgsl");
