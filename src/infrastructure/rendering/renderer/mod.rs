//! WebGPU resource manager for one scene.
//!
//! A [`RenderSession`] owns every device-side object of a viewer: surface,
//! device and queue, the depth attachment, the mesh/instance/uniform buffers
//! and the pipeline. It is created once per canvas and dropped on teardown;
//! nothing here lives in module-level state.

#[cfg(target_arch = "wasm32")]
use crate::domain::instances::InstanceStaging;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlCanvasElement;

#[cfg(target_arch = "wasm32")]
mod initialization;
mod performance;
#[cfg(target_arch = "wasm32")]
mod render_loop;

pub use performance::FrameStats;

/// 24-bit depth attachment format.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Size of the currently bound surface and depth attachment.
///
/// `generation` increases each time the attachment is re-provisioned, so
/// callers can tell a real resize from an idempotent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetState {
    width: u32,
    height: u32,
    generation: u64,
}

impl RenderTargetState {
    /// Zero dimensions are clamped to 1; a surface cannot be configured empty.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width.max(1), height: height.max(1), generation: 0 }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Whether a canvas of `width × height` pixels needs a new attachment.
    /// Zero-sized canvases (hidden, collapsed) never trigger a resize.
    pub fn needs_resize(&self, width: u32, height: u32) -> bool {
        width > 0 && height > 0 && (width, height) != (self.width, self.height)
    }

    /// The state after re-provisioning for `width × height`.
    pub fn resized(self, width: u32, height: u32) -> Self {
        Self { width: width.max(1), height: height.max(1), generation: self.generation + 1 }
    }
}

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Submitted,
    /// The surface was lost, outdated or timed out; the next frame retries.
    Skipped,
}

/// Static mesh, per-instance and uniform buffers.
#[cfg(target_arch = "wasm32")]
pub(crate) struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    uniform_buffer: wgpu::Buffer,
}

/// Compiled pipeline and the bind group exposing the uniform buffer.
#[cfg(target_arch = "wasm32")]
pub(crate) struct ScenePipeline {
    render_pipeline: wgpu::RenderPipeline,
    uniform_bind_group: wgpu::BindGroup,
}

#[cfg(target_arch = "wasm32")]
pub struct RenderSession {
    canvas: HtmlCanvasElement,

    // WGPU state
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    // Depth attachment, always sized like `config`
    target: RenderTargetState,
    depth_view: wgpu::TextureView,

    buffers: Option<MeshBuffers>,
    pipeline: Option<ScenePipeline>,

    // CPU mirror of the instance buffer
    instances: InstanceStaging,

    clear_color: wgpu::Color,
    stats: FrameStats,
}

#[cfg(target_arch = "wasm32")]
impl RenderSession {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn render_target(&self) -> RenderTargetState {
        self.target
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Staging area for instance writes; changes reach the GPU on the next
    /// [`RenderSession::flush_instances`].
    pub fn instances_mut(&mut self) -> &mut InstanceStaging {
        &mut self.instances
    }

    pub fn set_clear_color(&mut self, [r, g, b, a]: [f64; 4]) {
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Updates one instance record in place. Several writes before the next
    /// flush are coalesced into one upload.
    pub fn write_instance_attribute(&mut self, index: usize, offset: [f32; 3], scale: [f32; 3]) {
        self.instances.write(index, offset, scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_never_resizes() {
        let target = RenderTargetState::new(640, 480);
        assert!(!target.needs_resize(0, 480));
        assert!(!target.needs_resize(640, 0));
        assert!(!target.needs_resize(640, 480));
        assert!(target.needs_resize(800, 600));
    }
}
