use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tilescape_assets::TileAssets;
use tilescape_render::{
    FaceDraw, FaceGeometry, FaceKind, FaceRenderer, FaceTexture, FaceVertex, SetupError,
    ShaderStage,
};
use wgpu::util::DeviceExt;

use crate::shaders;
use crate::texture::{self, TileTexture};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ProjectionUniform {
    matrix: [[f32; 4]; 4],
}

/// Per-face data at one dynamic offset of the face buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct FaceUniform {
    model_view: [[f32; 4]; 4],
    /// min.x, min.y, max.x, max.y
    uv_rect: [f32; 4],
}

impl From<&FaceDraw> for FaceUniform {
    fn from(draw: &FaceDraw) -> Self {
        Self {
            model_view: draw.model_view.to_cols_array_2d(),
            uv_rect: [draw.uv.min.x, draw.uv.min.y, draw.uv.max.x, draw.uv.max.y],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    tex_coords: [f32; 2],
}

impl From<&FaceVertex> for GpuVertex {
    fn from(v: &FaceVertex) -> Self {
        Self {
            position: v.position,
            tex_coords: v.tex_coords,
        }
    }
}

const FACE_UNIFORM_SIZE: u64 = std::mem::size_of::<FaceUniform>() as u64;

/// Round the face uniform size up to the device's dynamic offset alignment.
fn uniform_stride(alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    FACE_UNIFORM_SIZE.div_ceil(alignment) * alignment
}

fn quad_buffer(device: &wgpu::Device, geometry: &FaceGeometry, label: &str) -> wgpu::Buffer {
    let vertices: Vec<GpuVertex> = geometry.vertices.iter().map(GpuVertex::from).collect();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// The distinct quads behind the six faces, in first-use draw order.
fn distinct_quads() -> Vec<&'static FaceGeometry> {
    let mut quads: Vec<&'static FaceGeometry> = Vec::new();
    for face in FaceKind::DRAW_ORDER {
        let geometry = FaceGeometry::for_face(face);
        if !quads.contains(&geometry) {
            quads.push(geometry);
        }
    }
    quads
}

/// GPU state built once from the loaded tile assets.
pub struct RenderResources {
    pipeline: wgpu::RenderPipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    face_layout: wgpu::BindGroupLayout,
    quads: Vec<(&'static FaceGeometry, wgpu::Buffer)>,
    atlas: TileTexture,
    back: TileTexture,
    side: TileTexture,
    stride: u64,
    surface_format: wgpu::TextureFormat,
}

impl RenderResources {
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        assets: &TileAssets,
    ) -> Result<Self, SetupError> {
        let vertex_module =
            shaders::compile(device, ShaderStage::Vertex, &assets.vertex_shader_src).await?;
        let fragment_module =
            shaders::compile(device, ShaderStage::Fragment, &assets.frag_shader_src).await?;

        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::bytes_of(&ProjectionUniform {
                matrix: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("projection_bind_group_layout"),
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
        });
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bind_group"),
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let face_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("face_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(FACE_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let texture_layout = TileTexture::bind_group_layout(device);
        let sampler = TileTexture::create_sampler(device);
        let atlas = TileTexture::from_image(
            device,
            queue,
            &texture_layout,
            &sampler,
            &assets.atlas,
            "atlas_texture",
        );
        let back = TileTexture::from_image(
            device,
            queue,
            &texture_layout,
            &sampler,
            &assets.back_tex,
            "back_texture",
        );
        let side = TileTexture::from_image(
            device,
            queue,
            &texture_layout,
            &sampler,
            &assets.side_tex,
            "side_texture",
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tile_pipeline_layout"),
            bind_group_layouts: &[&projection_layout, &face_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = shaders::link(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("tile_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(shaders::VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<GpuVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                        ],
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some(shaders::FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: texture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })
        .await?;

        let stride = uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        tracing::info!(?surface_format, stride, "tile render resources created");

        Ok(Self {
            pipeline,
            projection_buffer,
            projection_bind_group,
            face_layout,
            quads: distinct_quads()
                .into_iter()
                .map(|geometry| (geometry, quad_buffer(device, geometry, "face_vertices")))
                .collect(),
            atlas,
            back,
            side,
            stride,
            surface_format,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    fn vertices(&self, face: FaceKind) -> Option<&wgpu::Buffer> {
        let geometry = FaceGeometry::for_face(face);
        self.quads
            .iter()
            .find(|(quad, _)| *quad == geometry)
            .map(|(_, buffer)| buffer)
    }

    fn texture(&self, texture: FaceTexture) -> &TileTexture {
        match texture {
            FaceTexture::Atlas => &self.atlas,
            FaceTexture::Side => &self.side,
            FaceTexture::Back => &self.back,
        }
    }
}

struct QueuedFace {
    face: FaceKind,
    texture: FaceTexture,
    uniform: FaceUniform,
}

/// Face renderer backed by wgpu.
///
/// Draws are queued on the CPU by the [`FaceRenderer`] calls and encoded into
/// a single render pass by [`present`](Self::present).
pub struct WgpuRenderer {
    resources: RenderResources,
    face_buffer: wgpu::Buffer,
    face_bind_group: wgpu::BindGroup,
    face_capacity: usize,
    depth_view: wgpu::TextureView,
    projection: Mat4,
    queued: Vec<QueuedFace>,
}

impl WgpuRenderer {
    const INITIAL_FACE_CAPACITY: usize = 256;

    pub fn new(device: &wgpu::Device, resources: RenderResources, width: u32, height: u32) -> Self {
        let (face_buffer, face_bind_group) =
            Self::create_face_buffer(device, &resources, Self::INITIAL_FACE_CAPACITY);
        Self {
            resources,
            face_buffer,
            face_bind_group,
            face_capacity: Self::INITIAL_FACE_CAPACITY,
            depth_view: texture::create_depth_view(device, width, height),
            projection: Mat4::IDENTITY,
            queued: Vec::new(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = texture::create_depth_view(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.resources.surface_format()
    }

    /// Encode and submit the queued faces into `view`, clearing it to black
    /// first. An empty queue still clears.
    pub fn present(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) {
        if self.queued.len() > self.face_capacity {
            let capacity = self.queued.len().next_power_of_two();
            let (buffer, bind_group) = Self::create_face_buffer(device, &self.resources, capacity);
            self.face_buffer = buffer;
            self.face_bind_group = bind_group;
            self.face_capacity = capacity;
            tracing::debug!(capacity, "face uniform buffer grown");
        }

        let stride = self.resources.stride as usize;
        queue.write_buffer(
            &self.resources.projection_buffer,
            0,
            bytemuck::bytes_of(&ProjectionUniform {
                matrix: self.projection.to_cols_array_2d(),
            }),
        );
        if !self.queued.is_empty() {
            let mut staging = vec![0u8; stride * self.queued.len()];
            for (i, face) in self.queued.iter().enumerate() {
                let bytes = bytemuck::bytes_of(&face.uniform);
                staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
            }
            queue.write_buffer(&self.face_buffer, 0, &staging);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tile_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tile_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
                ..Default::default()
            });

            pass.set_pipeline(&self.resources.pipeline);
            pass.set_bind_group(0, &self.resources.projection_bind_group, &[]);
            for (i, face) in self.queued.iter().enumerate() {
                let Some(vertices) = self.resources.vertices(face.face) else {
                    tracing::warn!(face = ?face.face, "no vertex buffer for face");
                    continue;
                };
                let offset = (i * stride) as wgpu::DynamicOffset;
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_bind_group(1, &self.face_bind_group, &[offset]);
                pass.set_bind_group(2, &self.resources.texture(face.texture).bind_group, &[]);
                pass.draw(0..4, 0..1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(faces = self.queued.len(), "frame presented");
        self.queued.clear();
    }

    fn create_face_buffer(
        device: &wgpu::Device,
        resources: &RenderResources,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("face_uniform_buffer"),
            size: resources.stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("face_bind_group"),
            layout: &resources.face_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(FACE_UNIFORM_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }
}

impl FaceRenderer for WgpuRenderer {
    fn begin_frame(&mut self, projection: &Mat4) {
        self.projection = *projection;
        self.queued.clear();
    }

    fn draw_face(&mut self, draw: &FaceDraw) {
        self.queued.push(QueuedFace {
            face: draw.face,
            texture: draw.texture,
            uniform: FaceUniform::from(draw),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use tilescape_render::UvRect;

    #[test]
    fn face_uniform_layout_matches_wgsl() {
        // mat4x4<f32> followed by vec4<f32>.
        assert_eq!(FACE_UNIFORM_SIZE, 80);
        assert_eq!(std::mem::size_of::<GpuVertex>(), 20);
    }

    #[test]
    fn stride_respects_offset_alignment() {
        assert_eq!(uniform_stride(256), 256);
        assert_eq!(uniform_stride(64), 128);
        assert_eq!(uniform_stride(16), 80);
        assert_eq!(uniform_stride(0), 80);
    }

    #[test]
    fn face_uniform_from_draw() {
        let draw = FaceDraw {
            face: FaceKind::Front,
            texture: FaceTexture::Atlas,
            model_view: Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)),
            uv: UvRect {
                min: Vec2::new(0.4, 0.2),
                max: Vec2::new(0.6, 0.4),
            },
        };
        let uniform = FaceUniform::from(&draw);
        assert_eq!(uniform.uv_rect, [0.4, 0.2, 0.6, 0.4]);
        assert_eq!(uniform.model_view[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn one_quad_per_distinct_face_shape() {
        let quads = distinct_quads();
        assert_eq!(quads.len(), 3);
        assert_eq!(quads[0], &FaceGeometry::FRONT);
        assert_eq!(quads[1], &FaceGeometry::SIDE);
        assert_eq!(quads[2], &FaceGeometry::BACK);
        for face in FaceKind::DRAW_ORDER {
            assert!(quads.contains(&FaceGeometry::for_face(face)));
        }
    }

    #[test]
    fn vertices_copy_geometry() {
        let v = GpuVertex::from(&FaceGeometry::BACK.vertices[0]);
        assert_eq!(v.position, [1.0, -1.0, -0.1]);
        assert_eq!(v.tex_coords, [0.0, 1.0]);
    }
}
