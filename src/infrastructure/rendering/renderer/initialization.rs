use super::*;
use crate::domain::{
    errors::{RenderError, RenderResult},
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::rendering::gpu_structures::SceneUniforms;
use wgpu::util::DeviceExt;

impl RenderSession {
    /// Whether the browser exposes `navigator.gpu`.
    pub fn is_webgpu_supported() -> bool {
        web_sys::window()
            .map(|window| js_sys::Reflect::has(&window.navigator(), &"gpu".into()).unwrap_or(false))
            .unwrap_or(false)
    }

    /// Acquires adapter, device and surface for `canvas` and allocates the
    /// depth attachment at the canvas' current pixel size.
    ///
    /// Any missing capability is `UnsupportedDevice`; no buffers exist yet at
    /// that point.
    pub async fn new(canvas: HtmlCanvasElement) -> RenderResult<Self> {
        let unsupported = |stage: &str, detail: String| {
            RenderError::UnsupportedDevice(format!("{stage}: {detail}"))
        };

        if !Self::is_webgpu_supported() {
            return Err(unsupported("navigator.gpu", "missing".to_string()));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| unsupported("surface", e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| unsupported("adapter", format!("{e:?}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Scene Device"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| unsupported("device", format!("{e:?}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| unsupported("surface", "no presentable format".to_string()))?;

        let target = RenderTargetState::new(canvas.width(), canvas.height());
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: target.width(),
            height: target.height(),
            present_mode: caps.present_modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, target.width(), target.height());

        get_logger().info(
            LogComponent::Infrastructure("RenderSession"),
            &format!(
                "🎯 Surface configured: {}x{}, format: {:?}, present_mode: {:?}",
                config.width, config.height, config.format, config.present_mode
            ),
        );

        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            target,
            depth_view,
            buffers: None,
            pipeline: None,
            instances: InstanceStaging::new(Vec::new()),
            clear_color: wgpu::Color::BLACK,
            stats: FrameStats::new(),
        })
    }

    /// Uploads the static mesh once and allocates a fixed-size instance buffer
    /// holding `instances`. The instance count cannot change afterwards.
    pub fn provision_buffers<V: bytemuck::Pod>(
        &mut self,
        vertices: &[V],
        indices: &[u16],
        instances: InstanceStaging,
    ) {
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(instances.records()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::new()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        get_logger().info(
            LogComponent::Infrastructure("RenderSession"),
            &format!(
                "📦 Buffers provisioned: {} vertices, {} indices, {} instances",
                vertices.len(),
                indices.len(),
                instances.len()
            ),
        );

        let instance_capacity = instances.len() as u32;
        self.instances = instances;
        // The initial contents were uploaded with the buffer.
        self.instances.take_dirty();

        self.buffers = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            instance_capacity,
            uniform_buffer,
        });
    }

    /// Compiles `shader_source` and fixes the vertex layout, targeting
    /// `color_format` and `depth_format`.
    ///
    /// `vertex_layouts` lists the mesh layout first and the per-instance
    /// layout second. Depth testing uses `Less` with writes enabled, and back
    /// faces are culled.
    pub fn provision_pipeline(
        &mut self,
        shader_source: &str,
        vertex_layouts: &[wgpu::VertexBufferLayout<'_>],
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> RenderResult<()> {
        let buffers = self.buffers.as_ref().ok_or(RenderError::NotProvisioned("mesh buffers"))?;
        if depth_format != DEPTH_FORMAT {
            return Err(RenderError::InvalidConfig(format!(
                "depth attachment is {DEPTH_FORMAT:?}, pipeline asked for {depth_format:?}"
            )));
        }

        let uniform_bind_group_layout =
            self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers.uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: vertex_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
            cache: None,
        });

        get_logger().info(
            LogComponent::Infrastructure("RenderSession"),
            &format!("✅ Pipeline ready: color {color_format:?}, depth {depth_format:?}"),
        );

        self.pipeline = Some(ScenePipeline { render_pipeline, uniform_bind_group });
        Ok(())
    }

    /// Reconfigures the surface and reallocates the depth attachment for
    /// `width × height`. Returns `false` when nothing had to change.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.target.needs_resize(width, height) {
            return false;
        }

        self.target = self.target.resized(width, height);
        self.config.width = self.target.width();
        self.config.height = self.target.height();
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.target.width(), self.target.height());

        get_logger().debug(
            LogComponent::Infrastructure("RenderSession"),
            &format!("📐 Render target resized to {}x{}", width, height),
        );
        true
    }

    pub(super) fn reconfigure_surface(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
