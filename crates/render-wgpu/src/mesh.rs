use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::ops::Range;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side geometry, built once and uploaded.
#[derive(Debug, Default)]
pub(crate) struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Unit cube centered on the origin. Each face has its own four vertices
    /// so normals stay flat.
    pub(crate) fn unit_cube() -> Self {
        let mut mesh = Self::default();
        for (normal, up) in [
            (Vec3::X, Vec3::Y),
            (Vec3::NEG_X, Vec3::Y),
            (Vec3::Z, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y),
            (Vec3::Y, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::Z),
        ] {
            mesh.push_face(normal, up, normal * 0.5);
        }
        mesh
    }

    /// Unit quad in XY facing +Z, matching `Shape::Plane`.
    pub(crate) fn unit_quad() -> Self {
        let mut mesh = Self::default();
        mesh.push_face(Vec3::Z, Vec3::Y, Vec3::ZERO);
        mesh
    }

    /// Append a unit square centered at `center`, wound counter-clockwise
    /// when seen from the side `normal` points to.
    fn push_face(&mut self, normal: Vec3, up: Vec3, center: Vec3) {
        let right = up.cross(normal);
        let base = self.vertices.len() as u16;
        for (r, u) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            self.vertices.push(Vertex {
                position: (center + right * r + up * u).to_array(),
                normal: normal.to_array(),
            });
        }
        self.indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
}

/// Vertex and index buffers for one shape.
pub(crate) struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub(crate) fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    /// Draw `instances` of this mesh. The instance buffer must already be bound to slot 1.
    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        if instances.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_sit_half_a_unit_out() {
        let cube = MeshData::unit_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for v in &cube.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!((p.dot(n) - 0.5).abs() < 1e-6);
            assert!(p.abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn faces_wind_toward_their_normal() {
        let cube = MeshData::unit_cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(cube.vertices[tri[i] as usize].position));
            let n = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn quad_lies_in_xy() {
        let quad = MeshData::unit_quad();
        assert_eq!(quad.indices, vec![0, 1, 2, 2, 3, 0]);
        assert!(quad.vertices.iter().all(|v| v.position[2] == 0.0));
        assert_eq!(quad.vertices[0].position, [-0.5, -0.5, 0.0]);
        assert_eq!(quad.vertices[2].position, [0.5, 0.5, 0.0]);
    }
}
