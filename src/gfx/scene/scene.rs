use wgpu::Device;

use super::object::{Mesh, MeshId, Object};
use crate::{
    assets::ModelData,
    gfx::{camera::camera_utils::CameraManager, resources::layouts::SceneLayouts},
};

/// Stable handle to an object in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Meshes registered for one loaded model; spawn instances from it.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    name: String,
    meshes: Vec<MeshId>,
}

/// Main scene containing objects, their meshes, and the camera rig
pub struct Scene {
    pub camera_manager: CameraManager,
    meshes: Vec<Mesh>,
    objects: Vec<Object>,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            meshes: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Registers a model's meshes without placing anything in the scene.
    pub fn add_model(&mut self, model: &ModelData) -> ModelHandle {
        let first = self.meshes.len();
        self.meshes
            .extend(model.meshes.iter().map(Mesh::from_data));

        ModelHandle {
            name: model.name.clone(),
            meshes: (first..self.meshes.len()).collect(),
        }
    }

    /// Places a new instance of a model with an identity transform.
    ///
    /// Instances of the same model share meshes.
    pub fn spawn(&mut self, model: &ModelHandle) -> ObjectId {
        let name = self.ensure_unique_name(&model.name);
        self.objects.push(Object::new(name, model.meshes.clone()));
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    /// Meshes referenced by `object`, in draw order.
    pub fn meshes_of<'a>(&'a self, object: &'a Object) -> impl Iterator<Item = &'a Mesh> + 'a {
        object.meshes.iter().filter_map(|&id| self.meshes.get(id))
    }

    /// Creates GPU resources for anything added since the last call and
    /// uploads current transforms and materials.
    ///
    /// Assets arrive while the app runs, so this is called once per frame
    /// before drawing.
    pub fn sync_gpu(&mut self, device: &Device, queue: &wgpu::Queue, layouts: &SceneLayouts) {
        for mesh in self.meshes.iter_mut() {
            if mesh.has_gpu_resources() {
                mesh.update_material(queue);
            } else {
                mesh.init_gpu_resources(device, layouts);
            }
        }

        for object in self.objects.iter_mut() {
            if object.has_gpu_resources() {
                object.update_transform(queue);
            } else {
                object.init_gpu_resources(device, layouts);
            }
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let (total_triangles, total_vertices) = self
            .objects
            .iter()
            .flat_map(|object| self.meshes_of(object))
            .fold((0u32, 0u32), |(triangles, vertices), mesh| {
                (triangles + mesh.index_count() / 3, vertices + mesh.vertex_count())
            });

        SceneStatistics {
            object_count: self.objects.len(),
            mesh_count: self.meshes.len(),
            total_triangles,
            total_vertices,
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub mesh_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assets::MeshData, config::CameraConfig};

    fn triangle_model(name: &str) -> ModelData {
        ModelData {
            name: name.to_string(),
            meshes: vec![MeshData {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                normals: vec![[0.0, 0.0, 1.0]; 3],
                indices: vec![0, 1, 2],
                base_color: [1.0; 4],
            }],
        }
    }

    fn empty_scene() -> Scene {
        Scene::new(CameraManager::from_config(&CameraConfig::default(), 1.0))
    }

    #[test]
    fn test_spawned_instances_share_meshes() {
        let mut scene = empty_scene();
        let handle = scene.add_model(&triangle_model("marshmallow"));
        let a = scene.spawn(&handle);
        let b = scene.spawn(&handle);

        assert_ne!(a, b);
        assert_eq!(scene.object(a).unwrap().meshes, scene.object(b).unwrap().meshes);
        assert_eq!(scene.object(b).unwrap().name, "marshmallow (1)");

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.total_triangles, 2);
        assert_eq!(stats.total_vertices, 6);
    }

    #[test]
    fn test_model_without_instances_draws_nothing() {
        let mut scene = empty_scene();
        scene.add_model(&triangle_model("template"));
        assert_eq!(scene.objects().count(), 0);
        assert_eq!(scene.get_statistics().total_triangles, 0);
    }
}
