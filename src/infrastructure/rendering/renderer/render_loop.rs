use super::*;
use crate::domain::{
    errors::{RenderError, RenderResult},
    instances::InstanceRecord,
    logging::{LogComponent, get_logger},
    math::Mat4,
};
use crate::infrastructure::rendering::gpu_structures::SceneUniforms;
use crate::log_trace;

impl RenderSession {
    /// Uploads the combined transform to the uniform buffer.
    pub fn write_transform(&self, transform: &Mat4) -> RenderResult<()> {
        let buffers = self.buffers.as_ref().ok_or(RenderError::NotProvisioned("uniform buffer"))?;
        let uniforms = SceneUniforms::from_transform(*transform);
        self.queue.write_buffer(&buffers.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        Ok(())
    }

    /// Pushes pending instance writes to the GPU in one upload.
    ///
    /// Returns `true` when something was written.
    pub fn flush_instances(&mut self) -> RenderResult<bool> {
        let buffers = self.buffers.as_ref().ok_or(RenderError::NotProvisioned("instance buffer"))?;
        let Some((start, records)) = self.instances.take_dirty() else {
            return Ok(false);
        };

        let offset = (start * std::mem::size_of::<InstanceRecord>()) as wgpu::BufferAddress;
        self.queue.write_buffer(&buffers.instance_buffer, offset, bytemuck::cast_slice(records));
        log_trace!(
            LogComponent::Infrastructure("RenderSession"),
            "📤 Uploaded {} instance records from index {}",
            records.len(),
            start
        );
        Ok(true)
    }

    /// Records and submits one render pass: clear color and depth, bind the
    /// pipeline, mesh, instances and uniform, then one indexed draw of
    /// `instance_count` instances.
    ///
    /// Never waits on the GPU; it submits and returns.
    pub fn draw(&mut self, instance_count: u32, now_ms: f64) -> RenderResult<FrameOutcome> {
        let buffers = self.buffers.as_ref().ok_or(RenderError::NotProvisioned("mesh buffers"))?;
        let pipeline = self.pipeline.as_ref().ok_or(RenderError::NotProvisioned("pipeline"))?;
        let instance_count = instance_count.min(buffers.instance_capacity);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure_surface();
                self.stats.record_skip();
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                self.stats.record_skip();
                return Ok(FrameOutcome::Skipped);
            }
            Err(e) => {
                let message = format!("Failed to get surface texture: {e:?}");
                get_logger().error(LogComponent::Infrastructure("RenderSession"), &message);
                return Err(RenderError::Surface(message));
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&pipeline.render_pipeline);
            render_pass.set_bind_group(0, &pipeline.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, buffers.instance_buffer.slice(..));
            render_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..buffers.index_count, 0, 0..instance_count);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.stats.record_frame(now_ms);

        Ok(FrameOutcome::Submitted)
    }

    /// Frame statistics as JSON.
    pub fn performance_info(&self) -> String {
        self.stats.to_json()
    }
}
