use std::{
    borrow::Cow,
    path::Path,
    sync::Arc
};

use bytemuck::{
    Pod,
    Zeroable
};

use wgpu::{
    util::DeviceExt, Device, RenderPipeline, Surface
};
use winit::window::Window;

use crate::game::battle::TextureHandle;
use crate::game::math::Vector2F;

use super::{
    texture::{create_sprite_sampler, TextureData},
    Scene
};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    _pos: [f32; 4],
    _tex_coord: [f32; 2],
}

const fn vertex(x: f32, y: f32, u: f32, v: f32) -> Vertex {
    Vertex {
        _pos: [x, y, 0.0, 1.0],
        _tex_coord: [u, v],
    }
}

// Unit quad centered at the origin, scaled and translated per sprite by the
// model matrix.
const QUAD_VERTICES: [Vertex; 4] = [
    vertex(-0.5, -0.5, 0.0, 0.0), // Bottom-left
    vertex(0.5, -0.5, 1.0, 0.0),  // Bottom-right
    vertex(0.5, 0.5, 1.0, 1.0),   // Top-right
    vertex(-0.5, 0.5, 0.0, 1.0),  // Top-left
];

const QUAD_INDICES: [u16; 6] = [
    0, 1, 2, // First triangle
    2, 3, 0, // Second triangle
];

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Uniforms {
    model: [[f32; 4]; 4],
}

/// Column-major translate -> rotate-z -> scale. The projection stays the
/// fixed orthographic `[-1,1]` range, identity on x and y.
fn model_matrix(position: Vector2F, angle_deg: f32, size: Vector2F) -> [[f32; 4]; 4] {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    [
        [cos * size.x, sin * size.x, 0.0, 0.0],
        [-sin * size.y, cos * size.y, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [position.x, position.y, 0.0, 1.0],
    ]
}

pub struct State {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    render_pipeline: RenderPipeline,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    texture_bind_groups: Vec<wgpu::BindGroup>,
}

impl State {
    pub async fn new(window: Arc<Window>) -> State {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor::default(),
                None
            )
            .await
            .unwrap();

        let size = window.inner_size();

        let surface = instance.create_surface(window.clone()).unwrap();
        let cap = surface.get_capabilities(&adapter);
        let surface_format = cap.formats[0];

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let render_pipeline = Self::prepare_pipeline(
            &device,
            &surface,
            &adapter,
            &uniform_bind_group_layout,
            &texture_bind_group_layout,
        );

        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let sampler = create_sprite_sampler(&device);

        let mut state = State {
            window,
            device,
            queue,
            size,
            surface,
            surface_format,
            render_pipeline,
            uniform_bind_group_layout,
            texture_bind_group_layout,
            sampler,
            quad_vertex_buffer,
            quad_index_buffer,
            texture_bind_groups: vec![],
        };

        // Handle 0 is a solid placeholder for sprites without a texture.
        state.register_texture(
            TextureData::generate_solid(1, [255, 255, 255, 255]),
            "Placeholder",
        );

        // Configure surface for the first time
        state.configure_surface();

        state
    }

    fn prepare_pipeline(
        device: &Device,
        surface: &Surface,
        adapter: &wgpu::Adapter,
        uniform_bind_group_layout: &wgpu::BindGroupLayout,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[uniform_bind_group_layout, texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        };

        let swapchain_capabilities = surface.get_capabilities(adapter);
        let swapchain_format = swapchain_capabilities.formats[0];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                // PNG sprites carry transparency
                targets: &[Some(wgpu::ColorTargetState {
                    format: swapchain_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn get_window(&self) -> &Window {
        &self.window
    }

    /// Texture provider entry point. Failures are logged inside
    /// [`TextureData::load_or_fallback`] and a placeholder pattern is drawn
    /// instead, the returned handle is always usable.
    pub fn load_texture(&mut self, path: &Path) -> TextureHandle {
        let data = TextureData::load_or_fallback(path);
        self.register_texture(data, &path.display().to_string())
    }

    fn register_texture(&mut self, data: TextureData, label: &str) -> TextureHandle {
        let view = data.upload(&self.device, &self.queue, label);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.texture_bind_groups.push(bind_group);
        TextureHandle(self.texture_bind_groups.len() as u32 - 1)
    }

    fn texture_bind_group(&self, handle: Option<TextureHandle>) -> &wgpu::BindGroup {
        handle
            .and_then(|TextureHandle(id)| self.texture_bind_groups.get(id as usize))
            .unwrap_or(&self.texture_bind_groups[0])
    }

    fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            // Request compatibility with the sRGB-format texture view we're going to create later.
            view_formats: vec![self.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;

        // reconfigure the surface
        self.configure_surface();
    }

    pub fn render(&mut self, scene: &Scene) {
        // Create texture view
        let surface_texture = self.surface.get_current_texture()
            .expect("failed to acquire next swapchain texture");
        let texture_view = surface_texture.texture
            .create_view(&wgpu::TextureViewDescriptor {
                // Without add_srgb_suffix() the image we will be working with
                // might not be "gamma correct".
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut renderpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.2,
                            g: 0.3,
                            b: 0.3,
                            a: 1.0
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            renderpass.set_pipeline(&self.render_pipeline);
            renderpass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
            renderpass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            scene.sprites.iter().for_each(|sprite| {
                let uniform = Uniforms {
                    model: model_matrix(sprite.position, sprite.angle, sprite.size),
                };
                let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Sprite Uniform Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM,
                });

                let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Sprite Bind Group"),
                    layout: &self.uniform_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });

                renderpass.set_bind_group(0, &uniform_bind_group, &[]);
                renderpass.set_bind_group(1, self.texture_bind_group(sprite.texture), &[]);

                renderpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
            });
        }

        // Submit the command in the queue to execute
        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        surface_texture.present();
    }
}

#[test]
fn test_model_matrix_translation() {
    let m = model_matrix(Vector2F::new(0.3, -0.4), 0.0, Vector2F::new(1.0, 1.0));
    assert_eq!(m[3][0], 0.3);
    assert_eq!(m[3][1], -0.4);
    assert_eq!(m[0][0], 1.0);
    assert_eq!(m[1][1], 1.0);
}

#[test]
fn test_model_matrix_scaling() {
    let m = model_matrix(Vector2F::zero(), 0.0, Vector2F::new(0.2, 0.05));
    assert_eq!(m[0][0], 0.2);
    assert_eq!(m[1][1], 0.05);
    assert_eq!(m[0][1], 0.0);
    assert_eq!(m[1][0], 0.0);
}
