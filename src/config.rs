//! Scene configuration
//!
//! Every tunable of the scene lives here: asset paths, prop placement ranges,
//! the float motion of the main object, camera framing and clamps, lighting and
//! the intro overlay timing. All fields default to the values the scene was
//! designed with, so an empty JSON object (or no file at all) reproduces it.

use std::{
    f32::consts::PI,
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "MALLOW_CONFIG";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub assets: AssetPaths,
    pub placement: PlacementConfig,
    pub float_motion: FloatMotionConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub intro: IntroConfig,
    pub background: BackgroundPose,
}

impl SceneConfig {
    /// Reads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("Loading scene config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub main: PathBuf,
    pub background: PathBuf,
    pub floating: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            main: PathBuf::from("./assets/marshmallko.glb"),
            background: PathBuf::from("./assets/barn.glb"),
            floating: PathBuf::from("./assets/marshmallow.glb"),
        }
    }
}

/// A half-open sampling interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> Range<f32> {
        self.min..self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        self.as_range().contains(&value)
    }
}

/// Placement ranges for the floating props.
///
/// The angle range only covers the half circle behind the focal point
/// (`[-π, 0)`). Widening it changes the visible distribution of props.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub count: usize,
    pub radius: SampleRange,
    pub angle: SampleRange,
    pub height: SampleRange,
    pub rotation: SampleRange,
    pub scale: SampleRange,
    pub axis_component: SampleRange,
    pub rotation_speed: SampleRange,
    /// Fixes the random sequence when set.
    pub seed: Option<u64>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            count: 15,
            radius: SampleRange::new(1.0, 1.4),
            angle: SampleRange::new(-PI, 0.0),
            height: SampleRange::new(0.3, 1.5),
            rotation: SampleRange::new(0.0, PI),
            scale: SampleRange::new(0.05, 0.25),
            axis_component: SampleRange::new(-0.5, 0.5),
            rotation_speed: SampleRange::new(0.01, 0.03),
            seed: None,
        }
    }
}

/// Vertical float of the main object: `base + sin(time * frequency) * amplitude`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FloatMotionConfig {
    pub time_step: f64,
    pub base_height: f64,
    pub amplitude: f64,
    pub frequency: f64,
}

impl Default for FloatMotionConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            base_height: 0.1,
            amplitude: 0.07,
            frequency: 1.5,
        }
    }
}

/// Which pair of angle clamps the orbit camera uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClampPreset {
    /// polar `[0.3π, 0.5π]`, azimuth `[-0.2π, 0.2π]`
    #[default]
    Standard,
    /// polar `[0.3π, 0.6π]`, azimuth `[-0.1π, 0.1π]`
    Narrow,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub clamp_preset: ClampPreset,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.5, 3.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            min_distance: 2.0,
            max_distance: 3.0,
            clamp_preset: ClampPreset::Standard,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Window clear color, `0xa09090`.
    pub clear_color: [f32; 3],
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_position: [f32; 3],
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            clear_color: [160.0 / 255.0, 144.0 / 255.0, 144.0 / 255.0],
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.6,
            directional_position: [5.0, 10.0, 5.0],
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub title: String,
    /// Delay between activation and overlay removal, also the fade duration.
    pub removal_delay_ms: u64,
    /// Blur radius in pixels while the surface is blurred.
    pub blur_radius: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            title: "Marshmallko".to_string(),
            removal_delay_ms: 1200,
            blur_radius: 8.0,
        }
    }
}

/// Fixed pose of the background model.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BackgroundPose {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: f32,
}

impl Default for BackgroundPose {
    fn default() -> Self {
        Self {
            position: [0.0, -0.5, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config.placement.count, 15);
        assert_eq!(config.camera.clamp_preset, ClampPreset::Standard);
        assert_eq!(config.intro.removal_delay_ms, 1200);
        assert_eq!(config.float_motion.time_step, 0.01);
    }

    #[test]
    fn test_partial_override() {
        let config = SceneConfig::from_json(
            r#"{
                "placement": { "count": 4, "seed": 7 },
                "camera": { "clamp_preset": "narrow" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.placement.count, 4);
        assert_eq!(config.placement.seed, Some(7));
        assert_eq!(config.placement.scale, SampleRange::new(0.05, 0.25));
        assert_eq!(config.camera.clamp_preset, ClampPreset::Narrow);
        assert_eq!(config.camera.max_distance, 3.0);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = SceneConfig::load("./definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
