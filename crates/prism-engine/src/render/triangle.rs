use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::device::Gpu;
use crate::render::{RenderCtx, RenderTarget};
use crate::transform::MvpUniform;

use super::shader::{CompiledShader, ShaderProgram, ShaderStage};

const VERTEX_SHADER: &str = include_str!("shaders/triangle_vs.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/triangle_fs.wgsl");

/// Interleaved position + color vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub pos: [f32; 2],
    pub color: [f32; 3],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x3  // color
    ];

    pub const LOCATIONS: [u32; 2] = [0, 1];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    ColorVertex { pos: [-0.6, -0.4], color: [1.0, 0.0, 0.0] },
    ColorVertex { pos: [0.6, -0.4], color: [0.0, 1.0, 0.0] },
    ColorVertex { pos: [0.0, 0.6], color: [0.0, 0.0, 1.0] },
];

/// Compiles and links the bundled triangle shader pair.
pub fn triangle_program() -> Result<ShaderProgram, super::shader::ShaderError> {
    let vs = CompiledShader::compile(ShaderStage::Vertex, "vertex_shader", VERTEX_SHADER)?;
    let fs = CompiledShader::compile(ShaderStage::Fragment, "fragment_shader", FRAGMENT_SHADER)?;
    ShaderProgram::link(vs, fs, &ColorVertex::LOCATIONS)
}

/// Draws a single vertex-colored triangle transformed by an MVP uniform.
pub struct TriangleRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    mvp_ubo: wgpu::Buffer,
    vbo: wgpu::Buffer,
}

impl TriangleRenderer {
    /// Builds all GPU resources up front. Fails if the shaders do not compile or link.
    pub fn new(gpu: &Gpu<'_>) -> Result<Self> {
        let device = gpu.device();
        let program = triangle_program().context("triangle shader program")?;

        let vs_module = program.vertex().create_module(device);
        let fs_module = program.fragment().create_module(device);

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism triangle vbo"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mvp_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism triangle mvp ubo"),
            contents: bytemuck::bytes_of(&MvpUniform::from(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("prism triangle bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<MvpUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism triangle bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mvp_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prism triangle pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(program.vertex().entry_point()),
                compilation_options: Default::default(),
                buffers: &[ColorVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(program.fragment().entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("triangle pipeline ready ({:?})", gpu.surface_format());

        Ok(Self {
            pipeline,
            bind_group,
            mvp_ubo,
            vbo,
        })
    }

    /// Uploads `mvp` and draws the triangle over the full framebuffer.
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mvp: Mat4) {
        if !ctx.viewport.is_valid() {
            return;
        }

        ctx.queue
            .write_buffer(&self.mvp_ubo, 0, bytemuck::bytes_of(&MvpUniform::from(mvp)));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, ctx.viewport.width, ctx.viewport.height, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.draw(0..TRIANGLE_VERTICES.len() as u32, 0..1);
    }
}
