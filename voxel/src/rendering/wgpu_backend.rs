use std::mem::size_of;
use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cgmath::{Matrix4, SquareMatrix};
use log::{debug, info, warn};
use wgpu::util::DeviceExt;

use crate::rendering::texture::Texture;
use crate::rendering::{MatrixUniform, RenderBackend};
use crate::world::mesh::Vertex;

#[rustfmt::skip]
const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4941,
    g: 0.6627,
    b: 1.0,
    a: 1.0,
};

/// Room for the mesh of a single voxel
const INITIAL_VERTEX_CAPACITY: usize = 36;

type RawMatrix = [[f32; 4]; 4];
const MATRIX_SIZE: u64 = size_of::<RawMatrix>() as u64;

/// A chunk's vertex buffer on the GPU. The handle lives as long as the chunk, its storage is
/// reallocated with doubled capacity when a mesh does not fit anymore. Freed on drop.
pub struct WgpuVertexBuffer {
    buffer: Arc<wgpu::Buffer>,
    capacity: u64,
}

struct DrawCommand {
    buffer: Arc<wgpu::Buffer>,
    vertex_count: u32,
    model: Matrix4<f32>,
}

/// Renders chunks into an offscreen color target with a depth buffer.
///
/// Draw calls are recorded while the chunks are rendered and submitted in a single render pass by
/// [WgpuBackend::render_frame]. Every draw gets its model matrix through a dynamic offset into one uniform buffer.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    color_target: Texture,
    depth_texture: Texture,
    pipeline: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    model_bind_group_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    model_capacity: usize,

    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    current_model: Matrix4<f32>,
    program_active: bool,
    draws: Vec<DrawCommand>,
}

impl WgpuBackend {
    pub async fn new_offscreen(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Render target size must be greater than zero, got {width}x{height}");
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("WGPU could not find a compatible adapter")?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("voxel device"),
                ..Default::default()
            })
            .await
            .context("Could not request device and queue")?;

        let color_target = Texture::new_color_target(&device, width, height);
        let depth_texture = Texture::new_depth_texture(&device, width, height);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera buffer"),
            contents: bytemuck::cast_slice(&[raw_matrix(Matrix4::identity())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera bind group layout"),
            entries: &[matrix_layout_entry(false)],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let model_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Chunk model bind group layout"),
            entries: &[matrix_layout_entry(true)],
        });

        let model_stride = wgpu::util::align_to(
            MATRIX_SIZE,
            device
                .limits()
                .min_uniform_buffer_offset_alignment as u64,
        );
        let model_capacity = 1;
        let (model_buffer, model_bind_group) =
            create_model_buffer(&device, &model_bind_group_layout, model_stride, model_capacity);

        let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Chunk render pipeline layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Chunk render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: Texture::COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            color_target,
            depth_texture,
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_capacity,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            current_model: Matrix4::identity(),
            program_active: false,
            draws: Vec::new(),
        })
    }

    /// Submits every draw recorded since the last frame and clears the recording.
    /// Returns the number of submitted draw calls.
    pub fn render_frame(&mut self) -> Result<usize> {
        self.device
            .push_error_scope(wgpu::ErrorFilter::Validation);

        let view_proj = OPENGL_TO_WGPU_MATRIX * self.projection * self.view;
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[raw_matrix(view_proj)]));

        self.write_model_matrices();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Chunk frame encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Chunk render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for (i, draw) in self.draws.iter().enumerate() {
                let offset = (i as u64 * self.model_stride) as u32;
                let used_bytes = draw.vertex_count as u64 * size_of::<Vertex>() as u64;

                render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, draw.buffer.slice(..used_bytes));
                render_pass.draw(0..draw.vertex_count, 0..1);
            }
        }

        self.queue
            .submit(std::iter::once(encoder.finish()));

        let num_draws = self.draws.len();
        self.draws.clear();
        self.program_active = false;

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            bail!("Rendering the frame failed: {error}");
        }

        debug!("Submitted {num_draws} chunk draws");
        Ok(num_draws)
    }

    /// Out of memory errors are returned instead of reaching the uncaptured error handler
    fn allocate_vertex_storage(&self, size: u64) -> Result<wgpu::Buffer> {
        self.device
            .push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = self
            .device
            .create_buffer(&wgpu::BufferDescriptor {
                label: Some("Chunk vertex buffer"),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            bail!("Could not allocate {size} bytes of chunk vertex storage: {error}");
        }

        Ok(buffer)
    }

    fn write_model_matrices(&mut self) {
        if self.draws.is_empty() {
            return;
        }

        if self.draws.len() > self.model_capacity {
            self.model_capacity = self.draws.len().next_power_of_two();
            (self.model_buffer, self.model_bind_group) =
                create_model_buffer(&self.device, &self.model_bind_group_layout, self.model_stride, self.model_capacity);
            debug!("Grew chunk model uniform buffer to {} slots", self.model_capacity);
        }

        let stride = self.model_stride as usize;
        let mut bytes = vec![0u8; self.draws.len() * stride];
        for (slot, draw) in bytes.chunks_exact_mut(stride).zip(&self.draws) {
            slot[..MATRIX_SIZE as usize].copy_from_slice(bytemuck::cast_slice(&[raw_matrix(draw.model)]));
        }

        self.queue
            .write_buffer(&self.model_buffer, 0, &bytes);
    }
}

impl RenderBackend for WgpuBackend {
    type VertexBuffer = WgpuVertexBuffer;

    fn create_vertex_buffer(&mut self) -> Result<WgpuVertexBuffer> {
        let capacity = (INITIAL_VERTEX_CAPACITY * size_of::<Vertex>()) as u64;

        Ok(WgpuVertexBuffer {
            buffer: Arc::new(self.allocate_vertex_storage(capacity)?),
            capacity,
        })
    }

    fn upload_vertices(&mut self, buffer: &mut WgpuVertexBuffer, vertices: &[Vertex]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let needed = bytes.len() as u64;

        if needed > buffer.capacity {
            let capacity = grown_capacity(buffer.capacity, needed);
            buffer.buffer = Arc::new(self.allocate_vertex_storage(capacity)?);
            buffer.capacity = capacity;
            debug!("Grew chunk vertex buffer to {capacity} bytes");
        }

        if !bytes.is_empty() {
            self.queue.write_buffer(&buffer.buffer, 0, bytes);
        }

        Ok(())
    }

    fn use_program(&mut self) {
        if !self.draws.is_empty() {
            warn!("Discarding {} draws that were never submitted", self.draws.len());
            self.draws.clear();
        }

        self.program_active = true;
        self.current_model = Matrix4::identity();
    }

    fn set_matrix(&mut self, uniform: MatrixUniform, matrix: Matrix4<f32>) {
        match uniform {
            MatrixUniform::Model => self.current_model = matrix,
            MatrixUniform::View => self.view = matrix,
            MatrixUniform::Projection => self.projection = matrix,
        }
    }

    fn draw_triangles(&mut self, buffer: &WgpuVertexBuffer, vertex_count: u32) {
        if !self.program_active {
            warn!("Ignoring draw of {vertex_count} vertices, the chunk program is not in use");
            return;
        }

        self.draws.push(DrawCommand {
            buffer: Arc::clone(&buffer.buffer),
            vertex_count,
            model: self.current_model,
        });
    }
}

fn raw_matrix(matrix: Matrix4<f32>) -> RawMatrix {
    *AsRef::<RawMatrix>::as_ref(&matrix)
}

/// Never less than twice the current capacity
fn grown_capacity(current: u64, needed: u64) -> u64 {
    needed.max(current.saturating_mul(2))
}

fn matrix_layout_entry(has_dynamic_offset: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: NonZeroU64::new(MATRIX_SIZE),
        },
        count: None,
    }
}

fn create_model_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Chunk model buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Chunk model bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(MATRIX_SIZE),
            }),
        }],
    });

    (buffer, bind_group)
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix4, Vector3};

    use crate::rendering::wgpu_backend::{grown_capacity, raw_matrix};

    #[test]
    fn matrices_are_uploaded_column_major() {
        let raw = raw_matrix(Matrix4::from_translation(Vector3::new(4.0, 5.0, 6.0)));

        assert_eq!(raw[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(raw[3], [4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn vertex_storage_at_least_doubles() {
        assert_eq!(grown_capacity(864, 900), 1728);
        assert_eq!(grown_capacity(864, 10_000), 10_000);
        assert_eq!(grown_capacity(u64::MAX / 2 + 1, u64::MAX), u64::MAX);
    }
}
