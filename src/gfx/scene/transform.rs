//! Position / rotation / scale of a scene object.

use cgmath::{Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

/// Local transform of an object, composed as `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation from Euler angles (radians) applied in XYZ order.
    pub fn with_euler_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = euler_xyz(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Rotates about `axis` (object space, unit length) by `angle` radians.
    ///
    /// The increment composes with the current rotation, so repeated calls
    /// accumulate.
    pub fn rotate_on_axis(&mut self, axis: Vector3<f32>, angle: f32) {
        self.rotation = self.rotation * Quaternion::from_axis_angle(axis, Rad(angle));
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Quaternion for intrinsic X, then Y, then Z rotation.
pub fn euler_xyz(x: f32, y: f32, z: f32) -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(x))
        * Quaternion::from_angle_y(Rad(y))
        * Quaternion::from_angle_z(Rad(z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rotation};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_accumulates() {
        let axis = Vector3::new(0.0, 1.0, 0.0);
        let mut transform = Transform::new();
        for _ in 0..10 {
            transform.rotate_on_axis(axis, FRAC_PI_2 / 10.0);
        }

        // A quarter turn about +Y maps +X onto -Z
        let rotated = transform.rotation.rotate_vector(Vector3::new(1.0, 0.0, 0.0));
        assert!((rotated - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_matrix_applies_scale_then_translation() {
        let transform = Transform::new()
            .with_position(Vector3::new(1.0, 2.0, 3.0))
            .with_uniform_scale(0.5);
        let m = transform.matrix();
        let p = m * cgmath::Vector4::new(2.0, 0.0, 0.0, 1.0);
        assert!((p.truncate() - Vector3::new(2.0, 2.0, 3.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_euler_xyz_order() {
        let q = euler_xyz(FRAC_PI_2, FRAC_PI_2, 0.0);

        // Y turn applied first, then X: +Z lands on +X and +Y lands on +Z
        let z = q.rotate_vector(Vector3::new(0.0, 0.0, 1.0));
        assert!((z - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-6);
        let y = q.rotate_vector(Vector3::new(0.0, 1.0, 0.0));
        assert!((y - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-6);
    }
}
