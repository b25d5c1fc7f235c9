//! Shape renderer for flat coloured geometry
//!
//! Draws filled convex polygons (as triangle fans) and thick line segments
//! (as quads) with per-vertex RGBA colour. Vertices are submitted in call
//! order and drawn in a single pass, so later shapes cover earlier ones.

use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPass, RenderPipeline,
    SurfaceConfiguration, util::DeviceExt,
};

use super::shader_system::Shader;

/// Registry name of the shape shader
pub const SHAPE_SHADER_NAME: &str = "shape";

/// WGSL shader for shapes with viewport support
const SHAPE_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

struct Uniforms {
    coord_min: vec2<f32>,
    coord_max: vec2<f32>,
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    // Map logical coords (coord_min..coord_max) to NDC, y pointing down
    let coord_range = uniforms.coord_max - uniforms.coord_min;
    let ndc_x = ((in.position.x - uniforms.coord_min.x) / coord_range.x) * 2.0 - 1.0;
    let ndc_y = 1.0 - ((in.position.y - uniforms.coord_min.y) / coord_range.y) * 2.0;

    out.clip_position = vec4<f32>(ndc_x, ndc_y, 0.0, 1.0);
    out.color = in.color;

    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Vertex with RGBA colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Uniform buffer for viewport transforms
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    coord_min: [f32; 2],
    coord_max: [f32; 2],
}

/// Shape renderer shader
pub struct ShapeRenderer {
    pipeline: Option<RenderPipeline>,
    bind_group_layout: Option<BindGroupLayout>,
    bind_group: Option<BindGroup>,
    uniform_buffer: Option<Buffer>,
    vertex_buffer: Option<Buffer>,
    vertices: Vec<Vertex>,
    vertex_count: u32,
    coord_min: [f32; 2],
    coord_max: [f32; 2],
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self {
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_buffer: None,
            vertex_buffer: None,
            vertices: Vec::new(),
            vertex_count: 0,
            coord_min: [0.0, 0.0],
            coord_max: [800.0, 600.0],
        }
    }

    /// Sets the logical coordinate range mapped onto the render target
    pub fn set_viewport(&mut self, coord_min: [f32; 2], coord_max: [f32; 2]) {
        self.coord_min = coord_min;
        self.coord_max = coord_max;
    }

    /// Queues a filled convex polygon; fewer than three points draw nothing
    pub fn fill_polygon(&mut self, points: &[[f32; 2]], color: [f32; 4]) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        for pair in rest.windows(2) {
            self.vertices.extend([
                Vertex {
                    position: first,
                    color,
                },
                Vertex {
                    position: pair[0],
                    color,
                },
                Vertex {
                    position: pair[1],
                    color,
                },
            ]);
        }
    }

    /// Queues a thick line segment as a quad
    pub fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], thickness: f32, color: [f32; 4]) {
        let dx = to[0] - from[0];
        let dy = to[1] - from[1];
        let len = (dx * dx + dy * dy).sqrt();

        if len == 0.0 {
            return;
        }

        // Perpendicular direction for thickness
        let px = -dy / len * thickness * 0.5;
        let py = dx / len * thickness * 0.5;

        let corners = [
            [from[0] + px, from[1] + py],
            [from[0] - px, from[1] - py],
            [to[0] - px, to[1] - py],
            [to[0] + px, to[1] + py],
        ];
        self.fill_polygon(&corners, color);
    }

    /// Number of vertices queued this frame
    pub fn queued_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.vertex_count = 0;
    }

    fn update_vertex_buffer(&mut self, device: &Device) {
        self.vertex_count = self.vertices.len() as u32;

        if self.vertices.is_empty() {
            return;
        }

        self.vertex_buffer = Some(
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Shape Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
        );
    }

    fn update_uniform_buffer(&mut self, queue: &Queue) {
        if let Some(buffer) = &self.uniform_buffer {
            let uniforms = Uniforms {
                coord_min: self.coord_min,
                coord_max: self.coord_max,
            };
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }
}

impl Default for ShapeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Shader for ShapeRenderer {
    fn name(&self) -> &str {
        SHAPE_SHADER_NAME
    }

    fn init(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.coord_min = [0.0, 0.0];
        self.coord_max = [config.width as f32, config.height as f32];

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms {
                coord_min: self.coord_min,
                coord_max: self.coord_max,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shape Bind Group Layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shape Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(SHAPE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
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
        });

        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = Some(bind_group);
        self.uniform_buffer = Some(uniform_buffer);
    }

    fn begin_frame(&mut self, device: &Device, queue: &Queue) {
        self.update_uniform_buffer(queue);
        self.update_vertex_buffer(device);
    }

    fn render<'rpass>(&'rpass self, rpass: &mut RenderPass<'rpass>) {
        if self.vertex_count == 0 {
            return;
        }

        if let (Some(pipeline), Some(bind_group), Some(vertex_buffer)) =
            (&self.pipeline, &self.bind_group, &self.vertex_buffer)
        {
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
            rpass.draw(0..self.vertex_count, 0..1);
        }
    }

    fn end_frame(&mut self) {
        self.clear();
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_fans_into_triangles() {
        let mut renderer = ShapeRenderer::new();
        let diamond = [[0.0, -1.0], [1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]];
        renderer.fill_polygon(&diamond, [1.0; 4]);
        assert_eq!(renderer.queued_vertices(), 6);
        assert_eq!(renderer.vertices[3].position, [0.0, -1.0]);
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut renderer = ShapeRenderer::new();
        renderer.fill_polygon(&[[0.0, 0.0], [1.0, 1.0]], [1.0; 4]);
        renderer.stroke_line([2.0, 2.0], [2.0, 2.0], 3.0, [1.0; 4]);
        assert_eq!(renderer.queued_vertices(), 0);
    }

    #[test]
    fn test_line_quad_has_requested_thickness() {
        let mut renderer = ShapeRenderer::new();
        renderer.stroke_line([0.0, 0.0], [10.0, 0.0], 4.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(renderer.queued_vertices(), 6);
        let ys: Vec<f32> = renderer.vertices.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 2.0).abs() < 1e-6));

        renderer.clear();
        assert_eq!(renderer.queued_vertices(), 0);
    }
}
