//! Bind group layouts shared by the scene pipeline and per-object resources
//!
//! Objects and meshes create their bind groups lazily as assets arrive, so the
//! layouts live in one place and are handed to whoever needs them.

use crate::wgpu_utils::binding_types::{self, sequential_layout};

/// Layouts for bind groups 0..=2 of the scene pipeline.
pub struct SceneLayouts {
    /// Group 0: camera and lights
    pub globals: wgpu::BindGroupLayout,
    /// Group 1: per-object model and normal matrices
    pub transform: wgpu::BindGroupLayout,
    /// Group 2: per-mesh material
    pub material: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            globals: sequential_layout(
                device,
                "Globals Bind Group Layout",
                &[(
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    binding_types::uniform(),
                )],
            ),
            transform: sequential_layout(
                device,
                "Transform Bind Group Layout",
                &[(wgpu::ShaderStages::VERTEX, binding_types::uniform())],
            ),
            material: sequential_layout(
                device,
                "Material Bind Group Layout",
                &[(wgpu::ShaderStages::FRAGMENT, binding_types::uniform())],
            ),
        }
    }

    pub fn all(&self) -> Vec<wgpu::BindGroupLayout> {
        vec![
            self.globals.clone(),
            self.transform.clone(),
            self.material.clone(),
        ]
    }
}
