//! # Asset Loading
//!
//! Model files are parsed off the frame thread and handed back as plain CPU
//! data. The frame loop drains finished loads between ticks and turns them into
//! scene objects, so a model is simply absent until its load completes.
//!
//! - [`loader`] - OBJ (`tobj`) and glTF/GLB (`gltf`) parsing into [`ModelData`]
//! - [`queue`] - background load tasks and the completion channel

pub mod loader;
pub mod queue;

pub use loader::{load_model, MeshData, ModelData};
pub use queue::{AssetEvent, AssetQueue, AssetRole};
