// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers, and bind groups for rendering.

pub mod global_bindings;
pub mod layouts;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, LightConfig};
pub use layouts::SceneLayouts;
pub use material::MaterialUniform;
pub use texture_resource::TextureResource;
