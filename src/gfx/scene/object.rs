//! Meshes and objects
//!
//! A [`Mesh`] owns geometry and its material; an [`Object`] is a placed
//! instance referencing meshes by id. Clones of one model share the same
//! meshes and differ only by transform.

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use super::{transform::Transform, vertex::Vertex3D};
use crate::{
    assets::MeshData,
    gfx::resources::{
        layouts::SceneLayouts,
        material::{MaterialBindings, MaterialUniform},
    },
    wgpu_utils::{binding_types::sequential_bind_group, uniform_buffer::UniformBuffer},
};

/// Index of a mesh in the scene's mesh list.
pub type MeshId = usize;

struct MeshGpuResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    material: MaterialBindings,
}

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    pub material: MaterialUniform,
    gpu_resources: Option<MeshGpuResources>, // None until init_gpu_resources called
}

impl Mesh {
    pub fn from_data(data: &MeshData) -> Self {
        let vertices = data
            .positions
            .iter()
            .zip(&data.normals)
            .map(|(position, normal)| Vertex3D {
                position: *position,
                normal: *normal,
            })
            .collect();

        Self {
            vertices,
            indices: data.indices.clone(),
            material: MaterialUniform {
                base_color: data.base_color,
            },
            gpu_resources: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layouts: &SceneLayouts) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let material = MaterialBindings::new(device, &layouts.material, self.material);

        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            material,
        });
    }

    /// Pushes material edits to the GPU. Unchanged materials are not rewritten.
    pub fn update_material(&mut self, queue: &wgpu::Queue) {
        if let Some(gpu) = self.gpu_resources.as_mut() {
            gpu.material.update(queue, self.material);
        }
    }
}

/// Per-object uniform. Matches `ObjectTransform` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn from_transform(transform: &Transform) -> Self {
        let model = transform.matrix();
        // Inverse transpose keeps normals perpendicular under non-uniform scale
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

struct ObjectGpuResources {
    transform_buffer: UniformBuffer<ObjectUniform>,
    transform_bind_group: wgpu::BindGroup,
}

pub struct Object {
    pub name: String,
    pub meshes: Vec<MeshId>,
    pub transform: Transform,
    gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    pub fn new(name: impl Into<String>, meshes: Vec<MeshId>) -> Self {
        Self {
            name: name.into(),
            meshes,
            transform: Transform::default(),
            gpu_resources: None,
        }
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layouts: &SceneLayouts) {
        let transform_buffer =
            UniformBuffer::new_with_data(device, &ObjectUniform::from_transform(&self.transform));
        let transform_bind_group = sequential_bind_group(
            device,
            "Transform Bind Group",
            &layouts.transform,
            vec![transform_buffer.binding_resource()],
        );

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }

    /// Syncs the current transform to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        if let Some(gpu) = self.gpu_resources.as_mut() {
            gpu.transform_buffer
                .update_content(queue, ObjectUniform::from_transform(&self.transform));
        }
    }

    /// Get the transform bind group for rendering
    pub fn transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }
}

pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    /// Binds the mesh's material at group 2 and draws it.
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let Some(gpu) = mesh.gpu_resources.as_ref() else {
            return; // Skip drawing if not uploaded
        };

        self.set_bind_group(2, gpu.material.bind_group(), &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count(), 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_mesh_from_data_interleaves() {
        let data = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
            base_color: [1.0, 0.5, 0.25, 1.0],
        };
        let mesh = Mesh::from_data(&data);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.material.base_color, [1.0, 0.5, 0.25, 1.0]);
        assert!(!mesh.has_gpu_resources());
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let mut transform = Transform::new();
        transform.scale = Vector3::new(2.0, 1.0, 1.0);
        let uniform = ObjectUniform::from_transform(&transform);
        assert!((uniform.normal[0][0] - 0.5).abs() < 1e-6);
        assert!((uniform.normal[1][1] - 1.0).abs() < 1e-6);
    }
}
