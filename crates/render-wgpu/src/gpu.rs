use crate::camera::ViewCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use latticewalk_render::{RenderView, Scene, srgb_to_linear};
use wgpu::util::DeviceExt;

/// Directional plus ambient lighting.
///
/// Intensities are pre-divided by pi, matching Lambert shading with a white
/// light of intensity 2.5 and an ambient `#888899` of intensity 2. Colors are
/// linear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Direction toward the light; need not be normalized.
    pub direction: Vec3,
    pub intensity: f32,
    pub ambient: [f32; 3],
}

impl Default for Lighting {
    fn default() -> Self {
        let ambient = |c: u8| srgb_to_linear(c as f32 / 255.0) * 2.0 / std::f32::consts::PI;
        Self {
            direction: Vec3::new(0.5, 1.0, 0.1),
            intensity: 0.8,
            ambient: [ambient(0x88), ambient(0x88), ambient(0x99)],
        }
    }
}

const LATTICE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    fog: [f32; 4],
    background: [f32; 4],
    light: [f32; 4],
    ambient: [f32; 4],
}

impl Uniforms {
    fn new(camera: &ViewCamera, lighting: &Lighting) -> Self {
        let view = &camera.view;
        let [r, g, b] = view.background;
        let d = lighting.direction;
        let [ar, ag, ab] = lighting.ambient;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: view.eye.extend(1.0).to_array(),
            fog: [0.0, view.fog_far, 0.0, 0.0],
            background: [r, g, b, 1.0],
            light: [d.x, d.y, d.z, lighting.intensity],
            ambient: [ar, ag, ab, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    offset: [f32; 3],
    size: [f32; 3],
    color: [f32; 4],
}

/// Refill `out` with one instance per scene node: the unit cube scaled to
/// the node's box. Keeps the allocation across frames.
fn fill_instances(scene: &Scene, out: &mut Vec<InstanceData>) {
    out.clear();
    out.extend(scene.nodes().iter().map(|node| InstanceData {
        offset: node.position.to_array(),
        size: node.geometry.size.to_array(),
        color: LATTICE_COLOR,
    }));
}

/// Unit cube centered on the origin.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // normal, u, v
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let (n, u, v) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            vertices.push(Vertex {
                position: (n * 0.5 + u * su + v * sv).to_array(),
                normal,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// wgpu backend drawing every scene node as a lit, fogged box.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<InstanceData>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    pub lighting: Lighting,
}

impl WgpuRenderer {
    /// `capacity` is the expected instance count; the buffer grows if a
    /// scene ever exceeds it.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        capacity: usize,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(
                &ViewCamera::new(RenderView::default(), width, height),
                &Lighting::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lattice_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LATTICE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lattice_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x3,
                            3 => Float32x3,
                            4 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = capacity.max(1);
        let instance_buffer = Self::create_instance_buffer(device, instance_capacity);
        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!(instance_capacity, "lattice renderer created");

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            instance_buffer,
            instance_capacity,
            instances: Vec::with_capacity(instance_capacity),
            depth_texture,
            surface_format,
            width,
            height,
            lighting: Lighting::default(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Clear to the view's background and draw every scene node.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &Scene,
        view: &RenderView,
    ) {
        let camera = ViewCamera::new(*view, self.width, self.height);
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(&camera, &self.lighting)),
        );

        fill_instances(scene, &mut self.instances);
        let count = self.instances.len();
        if count > self.instance_capacity {
            self.instance_capacity = count.next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "instance buffer grown");
        }
        if count > 0 {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }

        let [r, g, b] = view.background;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.cube_index_count, 0, 0..count as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (capacity * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use latticewalk_render::{BoxGeometry, MaterialHandle, SceneGraph};

    /// Model matrix equivalent to the vertex shader's scale-then-offset.
    fn instance_model(instance: &InstanceData) -> Mat4 {
        Mat4::from_translation(Vec3::from(instance.offset)) * Mat4::from_scale(Vec3::from(instance.size))
    }

    #[test]
    fn cube_mesh_is_unit_and_closed() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        for v in &verts {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_outward() {
        let (verts, indices) = cube_mesh();
        for tri in indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(verts[tri[i] as usize].position));
            let n = Vec3::from(verts[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn instances_follow_scene_nodes() {
        let mut scene = Scene::new();
        let h = scene.create_shape(BoxGeometry::new(128.0, 3.0, 3.0), MaterialHandle::LATTICE);
        scene.set_position(h, Vec3::new(64.0, 0.0, -64.0)).unwrap();

        let mut data = Vec::new();
        fill_instances(&scene, &mut data);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].offset, [64.0, 0.0, -64.0]);
        assert_eq!(data[0].size, [128.0, 3.0, 3.0]);

        let model = instance_model(&data[0]);
        let corner = model.transform_point3(Vec3::splat(0.5));
        assert_eq!(corner, Vec3::new(128.0, 1.5, -62.5));
    }

    #[test]
    fn uniforms_carry_fog_and_background() {
        let view = RenderView {
            fog_far: 345.6,
            ..RenderView::default()
        };
        let u = Uniforms::new(&ViewCamera::new(view, 640, 480), &Lighting::default());
        assert_eq!(u.fog[1], 345.6);
        let [r, g, b] = view.background;
        assert_eq!(u.background, [r, g, b, 1.0]);
        assert!(u.background[0] < 0.5);
        assert_eq!(u.light, [0.5, 1.0, 0.1, 0.8]);
    }

    #[test]
    fn instance_list_is_refilled_not_appended() {
        let mut big = Scene::new();
        for x in 0..4 {
            let h = big.create_shape(BoxGeometry::new(1.0, 1.0, 1.0), MaterialHandle::LATTICE);
            big.set_position(h, Vec3::new(x as f32, 0.0, 0.0)).unwrap();
        }
        let mut small = Scene::new();
        let h = small.create_shape(BoxGeometry::new(2.0, 2.0, 2.0), MaterialHandle::LATTICE);
        small.set_position(h, Vec3::new(9.0, 9.0, 9.0)).unwrap();

        let mut data = Vec::new();
        fill_instances(&big, &mut data);
        assert_eq!(data.len(), 4);
        let capacity = data.capacity();

        fill_instances(&small, &mut data);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].offset, [9.0, 9.0, 9.0]);
        assert_eq!(data[0].size, [2.0, 2.0, 2.0]);
        assert_eq!(data.capacity(), capacity);
    }

    #[test]
    fn default_ambient_is_linear() {
        let ambient = Lighting::default().ambient;
        assert!((ambient[0] - 0.157).abs() < 1e-3);
        assert_eq!(ambient[0], ambient[1]);
        assert!(ambient[2] > ambient[0]);
    }

    #[test]
    fn uniform_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }
}
