//! Render pipeline creation
//!
//! Both pipelines share one bind group layout: a single uniform buffer holding
//! [`SkinningUniforms`]. The debug-line shader reads only its leading view
//! matrix.

use std::fmt::Display;
use std::mem::offset_of;

use anyhow::{Result, bail};
use skinning_core::SkinningUniforms;

use super::mesh_buffer::vertex_buffer_layout;
use crate::debug_draw::LineVertex;

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: offset_of!(LineVertex, position) as u64,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: offset_of!(LineVertex, color) as u64,
        shader_location: 1,
    },
];

fn line_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_ATTRIBUTES,
    }
}

pub fn create_uniform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Skinning Uniforms Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(SkinningUniforms::SIZE),
            },
            count: None,
        }],
    })
}

/// Pipelines plus the layout their bind group is built against.
pub struct Pipelines {
    pub skinning: wgpu::RenderPipeline,
    pub debug_lines: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        skinning_source: &str,
        debug_line_source: &str,
    ) -> Result<Self> {
        // Shader and pipeline errors are reported here instead of reaching the
        // device's uncaptured error handler
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let uniform_layout = create_uniform_bind_group_layout(device);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skinning Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let skinning_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skinning Shader"),
            source: wgpu::ShaderSource::Wgsl(skinning_source.into()),
        });
        let line_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Debug Line Shader"),
            source: wgpu::ShaderSource::Wgsl(debug_line_source.into()),
        });

        let skinning = create_pipeline(
            device,
            &pipeline_layout,
            "Skinning Pipeline",
            &skinning_module,
            vertex_buffer_layout(),
            wgpu::PrimitiveTopology::TriangleList,
            surface_format,
            None,
        );
        let debug_lines = create_pipeline(
            device,
            &pipeline_layout,
            "Debug Line Pipeline",
            &line_module,
            line_vertex_layout(),
            wgpu::PrimitiveTopology::LineList,
            surface_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );

        let scope_error = pollster::block_on(device.pop_error_scope());
        check_validation_scope("skinning pipelines", scope_error)?;

        tracing::debug!("Created skinning and debug line pipelines");

        Ok(Self {
            skinning,
            debug_lines,
            uniform_layout,
        })
    }
}

/// Turn the error popped from a validation scope into a failure.
fn check_validation_scope(label: &str, error: Option<impl Display>) -> Result<()> {
    if let Some(e) = error {
        tracing::error!("wgpu validation error in {}: {}", label, e);
        bail!("GPU rejected {}: {}", label, e);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    label: &str,
    module: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    surface_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // 2D mesh, either winding is visible
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_layout() {
        let layout = line_vertex_layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 8);
    }

    #[test]
    fn test_validation_scope_error_is_returned() {
        assert!(check_validation_scope("pipelines", None::<&str>).is_ok());

        let err = check_validation_scope("pipelines", Some("entry point 'vs' not found"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("pipelines"));
        assert!(err.contains("entry point 'vs' not found"));
    }
}
