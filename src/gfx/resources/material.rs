//! Material data for mesh rendering
//!
//! Models carry a single base color per mesh (MTL diffuse or glTF base color
//! factor). Shading is Lambertian, so nothing else is uploaded.

use crate::wgpu_utils::{binding_types::sequential_bind_group, uniform_buffer::UniformBuffer};

/// GPU uniform data for materials. Matches `Material` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            base_color: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

/// Uniform buffer and bind group for one mesh's material.
pub struct MaterialBindings {
    ubo: UniformBuffer<MaterialUniform>,
    bind_group: wgpu::BindGroup,
}

impl MaterialBindings {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        material: MaterialUniform,
    ) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &material);
        let bind_group = sequential_bind_group(
            device,
            "Material Bind Group",
            layout,
            vec![ubo.binding_resource()],
        );
        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, material: MaterialUniform) {
        self.ubo.update_content(queue, material);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
