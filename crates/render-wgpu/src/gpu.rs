use crate::mesh::{GpuMesh, MeshData, Vertex};
use crate::shaders::{self, MAX_DIRECTIONAL_LIGHTS};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use roomwalk_kernel::CameraPose;
use roomwalk_render::Projection;
use roomwalk_scene::{Color, Light, Scene, SceneObject, Shape};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_dirs: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    light_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

/// Per-object model matrix columns and linear color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    #[cfg(test)]
    fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&[self.model_0, self.model_1, self.model_2, self.model_3])
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Hex colors are authored in sRGB; shading happens in linear space.
fn linear_rgb(color: Color) -> [f32; 3] {
    color.rgb().map(srgb_to_linear)
}

fn instance_for(object: &SceneObject) -> InstanceData {
    let scale = match object.shape {
        Shape::Box { size } => size.as_vec3(),
        Shape::Plane { width, height } => Vec3::new(width as f32, height as f32, 1.0),
    };
    let model = object.transform.matrix().as_mat4() * Mat4::from_scale(scale);
    let cols = model.to_cols_array_2d();
    let [r, g, b] = linear_rgb(object.color);
    InstanceData {
        model_0: cols[0],
        model_1: cols[1],
        model_2: cols[2],
        model_3: cols[3],
        color: [r, g, b, 1.0],
    }
}

/// Instances for every box followed by every plane, and the box count.
fn build_instances(scene: &Scene) -> (Vec<InstanceData>, u32) {
    let boxes: Vec<InstanceData> = scene.boxes().map(instance_for).collect();
    let box_count = boxes.len() as u32;
    let mut instances = boxes;
    instances.extend(
        scene
            .objects()
            .iter()
            .filter(|o| !o.shape.is_box())
            .map(instance_for),
    );
    (instances, box_count)
}

fn light_uniforms(lights: &[Light], view_proj: Mat4) -> Uniforms {
    let mut uniforms = Uniforms {
        view_proj: view_proj.to_cols_array_2d(),
        ambient: [0.0; 4],
        light_dirs: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        light_colors: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
    };
    let mut count = 0usize;
    for light in lights {
        let [r, g, b] = linear_rgb(light.color());
        let intensity = light.intensity() as f32;
        match light.direction() {
            None => {
                uniforms.ambient[0] += r * intensity;
                uniforms.ambient[1] += g * intensity;
                uniforms.ambient[2] += b * intensity;
            }
            Some(dir) if count < MAX_DIRECTIONAL_LIGHTS => {
                let d = dir.as_vec3();
                uniforms.light_dirs[count] = [d.x, d.y, d.z, 0.0];
                uniforms.light_colors[count] = [r * intensity, g * intensity, b * intensity, 1.0];
                count += 1;
            }
            Some(_) => {
                tracing::warn!("more than {MAX_DIRECTIONAL_LIGHTS} directional lights, extra ignored");
            }
        }
    }
    uniforms.ambient[3] = count as f32;
    uniforms
}

/// Instanced boxes and planes with ambient plus directional light.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube: GpuMesh,
    quad: GpuMesh,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    const MAX_INSTANCES: u32 = 1_024;
    const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("room_uniforms"),
            contents: bytemuck::bytes_of(&light_uniforms(&[], Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("room_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                // Lights are read in the fragment stage.
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Uniforms>() as u64),
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("room_uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("room_instances"),
            size: u64::from(Self::MAX_INSTANCES) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::debug!(?surface_format, width, height, "room renderer created");

        Self {
            pipeline: create_pipeline(device, surface_format, &bind_group_layout),
            uniform_buffer,
            uniform_bind_group,
            cube: GpuMesh::upload(device, "cube", &MeshData::unit_cube()),
            quad: GpuMesh::upload(device, "quad", &MeshData::unit_quad()),
            instance_buffer,
            max_instances: Self::MAX_INSTANCES,
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
        }
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Clear `view` to black and draw the room from `pose`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        pose: &CameraPose,
        projection: &Projection,
    ) {
        let uniforms = light_uniforms(scene.lights(), projection.view_projection(pose));
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let (mut instances, mut box_count) = build_instances(scene);
        if instances.len() > self.max_instances as usize {
            tracing::warn!(
                objects = instances.len(),
                max = self.max_instances,
                "scene exceeds instance buffer, truncating"
            );
            instances.truncate(self.max_instances as usize);
            box_count = box_count.min(self.max_instances);
        }
        let total = instances.len() as u32;
        if total > 0 {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("room_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("room_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            self.cube.draw(&mut pass, 0..box_count);
            self.quad.draw(&mut pass, box_count..total);
        }
        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("room_depth"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("room_shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::ROOM_SHADER.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("room_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("room_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[Vertex::layout(), InstanceData::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(surface_format.into())],
        }),
        primitive: wgpu::PrimitiveState {
            // Planes are single quads seen from both sides.
            cull_mode: None,
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: WgpuRenderer::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
