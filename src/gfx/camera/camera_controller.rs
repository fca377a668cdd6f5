use std::f32::consts::TAU;

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::orbit_camera::OrbitCamera;

/// Per-notch dolly factor at zoom speed 1.
const ZOOM_BASE: f32 = 0.95;

/// Turns mouse drag and wheel input into pending orbit camera motion.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            is_mouse_pressed: false,
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                self.zoom(scroll, camera);
            }
            WindowEvent::Focused(false) => {
                self.is_mouse_pressed = false;
            }
            _ => (),
        }
    }

    pub fn process_device_event(
        &mut self,
        event: &DeviceEvent,
        viewport_height: u32,
        camera: &mut OrbitCamera,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.is_mouse_pressed {
                self.rotate(delta.0 as f32, delta.1 as f32, viewport_height, camera);
            }
        }
    }

    /// A drag across the full viewport height turns the camera once around.
    pub fn rotate(&self, dx: f32, dy: f32, viewport_height: u32, camera: &mut OrbitCamera) {
        let height = viewport_height.max(1) as f32;
        camera.rotate_left(TAU * dx / height * self.rotate_speed);
        camera.rotate_up(TAU * dy / height * self.rotate_speed);
    }

    /// Positive scroll (wheel away from the user) moves closer.
    pub fn zoom(&self, scroll: f32, camera: &mut OrbitCamera) {
        let factor = ZOOM_BASE.powf(self.zoom_speed);
        if scroll > 0.0 {
            camera.dolly_in(factor);
        } else if scroll < 0.0 {
            camera.dolly_out(factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    #[test]
    fn test_rotation_only_while_pressed() {
        let mut controller = CameraController::new(1.0, 1.0);
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        camera.damping = None;
        let start = camera.azimuth;

        let motion = DeviceEvent::MouseMotion { delta: (-40.0, 0.0) };
        controller.process_device_event(&motion, 800, &mut camera);
        camera.update();
        assert_eq!(camera.azimuth, start);

        controller.is_mouse_pressed = true;
        controller.process_device_event(&motion, 800, &mut camera);
        camera.update();
        assert!((camera.azimuth - (start + TAU * 40.0 / 800.0)).abs() < 1e-5);
    }

    #[test]
    fn test_scroll_up_moves_closer() {
        let controller = CameraController::new(1.0, 1.0);
        let mut camera = OrbitCamera::from_config(&CameraConfig::default(), 1.0);
        let start = camera.radius;

        controller.zoom(1.0, &mut camera);
        camera.update();
        assert!((camera.radius - start * ZOOM_BASE).abs() < 1e-5);
    }
}
