use cgmath::{Matrix4, SquareMatrix};
use winit::event::{DeviceEvent, WindowEvent};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};
use crate::config::CameraConfig;

/// Camera rig: the orbit camera plus the controller feeding it input.
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(
            OrbitCamera::from_config(config, aspect),
            CameraController::new(config.rotate_speed, config.zoom_speed),
        )
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        self.controller
            .process_window_event(event, &mut self.camera);
    }

    /// `viewport_height` converts pointer motion into rotation angles.
    pub fn process_device_event(&mut self, event: &DeviceEvent, viewport_height: u32) {
        self.controller
            .process_device_event(event, viewport_height, &mut self.camera);
    }

    /// Per-frame controller update: damping towards pending input, then clamps.
    pub fn update(&mut self) -> bool {
        let moved = self.camera.update();
        self.camera.update_view_proj();
        moved
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
