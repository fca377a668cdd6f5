//! # Scene Management Module
//!
//! Objects placed in the world, the meshes they draw, and their transforms.
//!
//! ## Key Components
//!
//! - [`Scene`] - Container for the camera rig, registered meshes and objects
//! - [`Object`] - A placed instance referencing shared meshes
//! - [`Transform`] - Position, quaternion rotation and scale of an object
//! - [`Vertex3D`] - GPU vertex layout with position and normal
//!
//! ## Usage
//!
//! ```no_run
//! # use mallow::gfx::scene::Scene;
//! # use mallow::assets::ModelData;
//! # fn place(scene: &mut Scene, model: &ModelData) {
//! let handle = scene.add_model(model);
//! let id = scene.spawn(&handle);
//! scene.object_mut(id).unwrap().transform.position.y = 0.1;
//! # }
//! ```

pub mod object;
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use object::{DrawMesh, Mesh, MeshId, Object};
pub use scene::{ModelHandle, ObjectId, Scene, SceneStatistics};
pub use transform::Transform;
pub use vertex::Vertex3D;
