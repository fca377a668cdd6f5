//! Random scatter of the floating props around the focal point.

use cgmath::{InnerSpace, Vector3};
use rand::Rng;

use crate::{
    config::{PlacementConfig, SampleRange},
    gfx::scene::Transform,
};

/// Continuous in-place rotation of one prop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Unit axis in object space.
    pub axis: Vector3<f32>,
    /// Radians per tick.
    pub speed: f32,
}

impl Spin {
    pub fn apply(&self, transform: &mut Transform) {
        transform.rotate_on_axis(self.axis, self.speed);
    }
}

/// Initial pose and spin for one prop instance.
#[derive(Debug, Clone, Copy)]
pub struct PropPlacement {
    pub transform: Transform,
    pub spin: Spin,
}

fn sample(rng: &mut impl Rng, range: SampleRange) -> f32 {
    if range.min < range.max {
        rng.random_range(range.as_range())
    } else {
        range.min
    }
}

/// Samples `config.count` independent placements.
///
/// Props land on a half ring behind the focal point (z <= 0 with the default
/// angle range). The axis is not guarded against a near-zero sample; in that
/// case it normalizes to NaN and the prop stops rendering sensibly.
pub fn scatter_props(rng: &mut impl Rng, config: &PlacementConfig) -> Vec<PropPlacement> {
    (0..config.count)
        .map(|_| {
            let radius = sample(rng, config.radius);
            let angle = sample(rng, config.angle);
            let height = sample(rng, config.height);
            let position = Vector3::new(angle.cos() * radius, height, angle.sin() * radius);

            let (rx, ry, rz) = (
                sample(rng, config.rotation),
                sample(rng, config.rotation),
                sample(rng, config.rotation),
            );
            let scale = sample(rng, config.scale);

            let axis = Vector3::new(
                sample(rng, config.axis_component),
                sample(rng, config.axis_component),
                sample(rng, config.axis_component),
            )
            .normalize();
            let speed = sample(rng, config.rotation_speed);

            PropPlacement {
                transform: Transform::new()
                    .with_position(position)
                    .with_euler_xyz(rx, ry, rz)
                    .with_uniform_scale(scale),
                spin: Spin { axis, speed },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn scatter(seed: u64) -> Vec<PropPlacement> {
        let mut rng = StdRng::seed_from_u64(seed);
        scatter_props(&mut rng, &PlacementConfig::default())
    }

    #[test]
    fn test_count_matches_config() {
        assert_eq!(scatter(1).len(), 15);

        let config = PlacementConfig {
            count: 0,
            ..Default::default()
        };
        assert!(scatter_props(&mut StdRng::seed_from_u64(1), &config).is_empty());
    }

    #[test]
    fn test_axes_are_unit_length() {
        for placement in scatter(2) {
            assert!((placement.spin.axis.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_samples_stay_in_ranges() {
        let config = PlacementConfig::default();
        for seed in 0..20 {
            for placement in scatter(seed) {
                let p = placement.transform.position;
                let horizontal = (p.x * p.x + p.z * p.z).sqrt();

                assert!(config.height.contains(p.y), "height {}", p.y);
                assert!(horizontal >= 1.0 - 1e-5 && horizontal < 1.4 + 1e-5);
                assert!(p.z <= 1e-6, "z {} in front of focal point", p.z);
                assert!(config.scale.contains(placement.transform.scale.x));
                assert_eq!(placement.transform.scale.x, placement.transform.scale.z);
                assert!(config.rotation_speed.contains(placement.spin.speed));
            }
        }
    }

    #[test]
    fn test_seeded_scatter_is_reproducible() {
        let a = scatter(42);
        let b = scatter(42);
        for (a, b) in a.iter().zip(&b) {
            assert_eq!(a.transform, b.transform);
            assert_eq!(a.spin, b.spin);
        }
    }

    #[test]
    fn test_degenerate_range_uses_min() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sample(&mut rng, SampleRange::new(0.5, 0.5)), 0.5);
    }
}
