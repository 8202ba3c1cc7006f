//! wgpu rendering for the skinning viewer
//!
//! One surface, one uniform buffer, the skinned mesh buffers and an
//! immediate-mode line buffer refilled every frame.

mod growable_buffer;
mod mesh_buffer;
mod pipeline;

use std::sync::Arc;

use anyhow::{Context, Result};
use skinning_core::{MeshData, SkinningUniforms};
use winit::window::Window;

use crate::debug_draw::DebugLines;
use growable_buffer::GrowableBuffer;
use mesh_buffer::SkinnedMeshBuffers;
use pipeline::Pipelines;

const INITIAL_LINE_BYTES: u64 = 16 * 1024;

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// Surface was lost or outdated and has been reconfigured
    Reconfigured,
    /// Nothing to draw into (zero-sized or timed out)
    Skipped,
}

pub struct Graphics {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    mesh: SkinnedMeshBuffers,
    lines: GrowableBuffer,
    line_vertex_count: u32,
}

impl Graphics {
    /// Create the device, surface, pipelines and buffers for `window`.
    pub fn new(
        window: Arc<Window>,
        vsync: bool,
        skinning_shader: &str,
        debug_line_shader: &str,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Failed to find suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Skinning Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            experimental_features: Default::default(),
            trace: wgpu::Trace::Off,
        }))
        .context("Failed to create GPU device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipelines = Pipelines::new(&device, surface_format, skinning_shader, debug_line_shader)
            .context("Failed to create render pipelines")?;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Skinning Uniforms"),
            size: SkinningUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skinning Uniforms Bind Group"),
            layout: &pipelines.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mesh = SkinnedMeshBuffers::new(&device);
        let lines = GrowableBuffer::new(
            &device,
            wgpu::BufferUsages::VERTEX,
            "Debug Lines",
            INITIAL_LINE_BYTES,
        );

        tracing::info!(
            "Graphics initialized: {} ({:?}), {}x{}, format: {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_config.width,
            surface_config.height,
            surface_format
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            pipelines,
            uniform_buffer,
            uniform_bind_group,
            mesh,
            lines,
            line_vertex_count: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.surface_config.width
    }

    pub fn height(&self) -> u32 {
        self.surface_config.height
    }

    /// Resize the surface. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
            tracing::debug!("Surface resized to {}x{}", width, height);
        }
    }

    /// Replace the mesh buffers wholesale.
    pub fn upload_mesh(&mut self, mesh: &MeshData) {
        self.mesh.upload(&self.device, &self.queue, mesh);
    }

    /// Draw one frame: the skinned mesh, then the debug lines on top.
    pub fn render(
        &mut self,
        uniforms: &SkinningUniforms,
        lines: &DebugLines,
        clear_color: [f32; 4],
    ) -> FrameStatus {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return FrameStatus::Reconfigured;
            }
            Err(e) => {
                tracing::warn!("Failed to acquire frame: {}", e);
                return FrameStatus::Skipped;
            }
        };

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        self.lines
            .replace(&self.device, &self.queue, bytemuck::cast_slice(lines.vertices()));
        self.line_vertex_count = lines.vertex_count();

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Skinning Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear_color[0] as f64,
                            g: clear_color[1] as f64,
                            b: clear_color[2] as f64,
                            a: clear_color[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            pass.set_pipeline(&self.pipelines.skinning);
            self.mesh.draw(&mut pass);

            if self.line_vertex_count > 0 {
                pass.set_pipeline(&self.pipelines.debug_lines);
                pass.set_vertex_buffer(0, self.lines.buffer().slice(..self.lines.len()));
                pass.draw(0..self.line_vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        FrameStatus::Presented
    }
}
