use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::{CameraConfig, ClampPreset};
use cgmath::*;
use std::f32::consts::PI;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPSILON: f32 = 1e-6;

/// Camera orbiting a target on a sphere, Y up.
///
/// `polar` is measured from +Y, `azimuth` around +Y starting at +Z. Input does
/// not move the camera directly: it accumulates a pending delta that
/// [`OrbitCamera::update`] applies (damped or not) and then clamps.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub radius: f32,
    pub polar: f32,
    pub azimuth: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    /// Damping factor; `None` applies input in full on the next update.
    pub damping: Option<f32>,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_scale: f32,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    /// Places the camera at `eye` looking at `target`.
    ///
    /// Bounds are not applied until the first [`OrbitCamera::update`].
    pub fn new(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let (radius, polar, azimuth) = spherical_from_offset(eye - target);
        Self {
            radius,
            polar,
            azimuth,
            eye,
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            damping: None,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_scale: 1.0,
            aspect,
            fovy: Rad(PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        }
    }

    /// Builds the camera rig described by `config` and applies its clamps once.
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(
            Vector3::from(config.position),
            Vector3::from(config.target),
            aspect,
        );
        camera.fovy = Deg(config.fov_degrees).into();
        camera.znear = config.znear;
        camera.zfar = config.zfar;
        camera.damping = config.enable_damping.then_some(config.damping_factor);
        camera.bounds = OrbitCameraBounds::from_preset(
            config.clamp_preset,
            config.min_distance,
            config.max_distance,
        );
        // Clamps only take effect through update()
        camera.update();
        camera
    }

    /// Queues a rotation around the vertical axis.
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_azimuth -= angle;
    }

    /// Queues a rotation towards the top pole.
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_polar -= angle;
    }

    /// Moves towards the target by `factor` (< 1 gets closer).
    pub fn dolly_in(&mut self, factor: f32) {
        self.pending_scale *= factor;
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if factor > 0.0 {
            self.pending_scale /= factor;
        }
    }

    /// Applies pending input, enforces bounds and recomputes the eye position.
    ///
    /// Returns true if the eye moved.
    pub fn update(&mut self) -> bool {
        let applied = self.damping.unwrap_or(1.0);
        self.azimuth += self.pending_azimuth * applied;
        self.polar += self.pending_polar * applied;

        self.azimuth = self
            .azimuth
            .clamp(self.bounds.min_azimuth, self.bounds.max_azimuth);
        self.polar = self
            .polar
            .clamp(self.bounds.min_polar, self.bounds.max_polar)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.pending_scale)
            .clamp(self.bounds.min_distance, self.bounds.max_distance);

        match self.damping {
            Some(factor) => {
                self.pending_azimuth *= 1.0 - factor;
                self.pending_polar *= 1.0 - factor;
            }
            None => {
                self.pending_azimuth = 0.0;
                self.pending_polar = 0.0;
            }
        }
        self.pending_scale = 1.0;

        let previous = self.eye;
        self.eye = self.target + offset_from_spherical(self.radius, self.polar, self.azimuth);
        (self.eye - previous).magnitude2() > f32::EPSILON
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

/// Hard limits for the orbit. Unbounded limits are infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_azimuth: f32,
    pub max_azimuth: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: 0.0,
            max_polar: PI,
            min_azimuth: f32::NEG_INFINITY,
            max_azimuth: f32::INFINITY,
        }
    }
}

impl OrbitCameraBounds {
    pub fn from_preset(preset: ClampPreset, min_distance: f32, max_distance: f32) -> Self {
        let (polar, azimuth) = match preset {
            ClampPreset::Standard => ((0.3, 0.5), 0.2),
            ClampPreset::Narrow => ((0.3, 0.6), 0.1),
        };
        Self {
            min_distance,
            max_distance,
            min_polar: PI * polar.0,
            max_polar: PI * polar.1,
            min_azimuth: -PI * azimuth,
            max_azimuth: PI * azimuth,
        }
    }

    pub fn contains(&self, camera: &OrbitCamera) -> bool {
        (self.min_distance..=self.max_distance).contains(&camera.radius)
            && (self.min_polar..=self.max_polar).contains(&camera.polar)
            && (self.min_azimuth..=self.max_azimuth).contains(&camera.azimuth)
    }
}

/// Returns `(radius, polar, azimuth)` for an offset from the target.
fn spherical_from_offset(offset: Vector3<f32>) -> (f32, f32, f32) {
    let radius = offset.magnitude();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
    let azimuth = offset.x.atan2(offset.z);
    (radius, polar, azimuth)
}

fn offset_from_spherical(radius: f32, polar: f32, azimuth: f32) -> Vector3<f32> {
    let sin_polar = polar.sin();
    Vector3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig(preset: ClampPreset) -> OrbitCamera {
        let config = CameraConfig {
            clamp_preset: preset,
            ..Default::default()
        };
        OrbitCamera::from_config(&config, 1.5)
    }

    #[test]
    fn test_initial_update_applies_distance_clamp() {
        let camera = rig(ClampPreset::Standard);
        // (0, 0.5, 3) is sqrt(9.25) away, beyond the 3.0 limit
        assert!((camera.radius - 3.0).abs() < 1e-5);
        assert!(camera.azimuth.abs() < 1e-6);
        assert!((camera.eye.magnitude() - 3.0).abs() < 1e-5);
        assert!(camera.bounds.contains(&camera));
    }

    #[test]
    fn test_spherical_round_trip() {
        let offset = Vector3::new(0.4, 0.5, 2.0);
        let (r, polar, azimuth) = spherical_from_offset(offset);
        let back = offset_from_spherical(r, polar, azimuth);
        assert!((back - offset).magnitude() < 1e-5);
    }

    #[test]
    fn test_huge_drag_stays_clamped() {
        for preset in [ClampPreset::Standard, ClampPreset::Narrow] {
            let mut camera = rig(preset);
            camera.rotate_left(1.0e4);
            camera.rotate_up(-1.0e4);
            camera.dolly_out(1.0e-6);
            for _ in 0..200 {
                camera.update();
                assert!(camera.bounds.contains(&camera), "{:?}: {:?}", preset, camera);
            }

            camera.rotate_left(-1.0e4);
            camera.rotate_up(1.0e4);
            camera.dolly_in(1.0e-6);
            for _ in 0..200 {
                camera.update();
                assert!(camera.bounds.contains(&camera), "{:?}: {:?}", preset, camera);
            }
        }
    }

    #[test]
    fn test_drag_reaches_clamp_edges() {
        let mut camera = rig(ClampPreset::Standard);
        camera.rotate_left(-100.0);
        camera.dolly_in(1.0e-3);
        for _ in 0..500 {
            camera.update();
        }
        assert!((camera.azimuth - 0.2 * PI).abs() < 1e-5);
        assert!((camera.radius - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_damping_spreads_input_over_updates() {
        let mut camera = rig(ClampPreset::Standard);
        let start = camera.azimuth;
        camera.rotate_left(-0.1);

        camera.update();
        assert!((camera.azimuth - start - 0.1 * 0.05).abs() < 1e-6);

        for _ in 0..1000 {
            camera.update();
        }
        assert!((camera.azimuth - start - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_without_damping_input_applies_at_once() {
        let mut camera = rig(ClampPreset::Standard);
        camera.damping = None;
        let start = camera.polar;
        camera.rotate_up(0.05);
        camera.update();
        assert!((camera.polar - (start - 0.05)).abs() < 1e-6);

        let moved = camera.update();
        assert!(!moved);
    }

    #[test]
    fn test_resize_sets_aspect() {
        let mut camera = rig(ClampPreset::Standard);
        camera.resize_projection(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        camera.resize_projection(10, 0);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
