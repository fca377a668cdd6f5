//! Global uniform bindings for camera and scene lighting
//!
//! Manages the uniform buffer and bind group for per-frame state shared by
//! every object: camera matrices, the ambient term and one directional light.

use crate::{
    config::LightingConfig,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{binding_types::sequential_bind_group, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content.
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],         // rgb * intensity, w unused
    light_direction: [f32; 4], // towards the light, normalized, w unused
    light_color: [f32; 4],     // rgb * intensity, w unused
}

/// Ambient plus directional light, as the scene is lit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::from(&LightingConfig::default())
    }
}

impl From<&LightingConfig> for LightConfig {
    fn from(config: &LightingConfig) -> Self {
        Self {
            ambient_color: config.ambient_color,
            ambient_intensity: config.ambient_intensity,
            position: config.directional_position,
            color: config.directional_color,
            intensity: config.directional_intensity,
        }
    }
}

impl LightConfig {
    /// A directional light shines from its position towards the origin.
    fn direction(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        let length = (x * x + y * y + z * z).sqrt();
        if length > 0.0 {
            [x / length, y / length, z / length]
        } else {
            [0.0, 1.0, 0.0]
        }
    }

    fn content(&self, camera: CameraUniform) -> GlobalUBOContent {
        let scaled = |c: [f32; 3], k: f32| [c[0] * k, c[1] * k, c[2] * k, 0.0];
        let [dx, dy, dz] = self.direction();
        GlobalUBOContent {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: scaled(self.ambient_color, self.ambient_intensity),
            light_direction: [dx, dy, dz, 0.0],
            light_color: scaled(self.color, self.intensity),
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Uniform buffer and bind group for group 0 of the scene pipeline.
pub struct GlobalBindings {
    ubo: GlobalUBO,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let ubo = GlobalUBO::new(device);
        let bind_group = sequential_bind_group(
            device,
            "Global Bind Group",
            layout,
            vec![ubo.binding_resource()],
        );
        Self { ubo, bind_group }
    }

    /// Uploads camera and light data for the coming frame.
    pub fn update(&mut self, queue: &wgpu::Queue, camera: CameraUniform, light: &LightConfig) {
        self.ubo.update_content(queue, light.content(camera));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_direction_points_at_light() {
        let light = LightConfig::default();
        let [x, y, z] = light.direction();
        assert!((x * x + y * y + z * z - 1.0).abs() < 1e-6);
        assert!(y > x && y > z);
    }

    #[test]
    fn test_content_scales_colors_by_intensity() {
        let light = LightConfig::default();
        let content = light.content(CameraUniform::default());
        assert!((content.ambient[0] - 0.6).abs() < 1e-6);
        assert!((content.light_color[1] - 1.0).abs() < 1e-6);
    }
}
