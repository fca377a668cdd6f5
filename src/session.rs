//! Scene session
//!
//! One context object owning everything the frame loop mutates: the scene and
//! camera rig, the main and background objects, the floating props, the clock,
//! the intro overlay and the viewport. It has no GPU state, so the whole frame
//! update can run headless.

use std::path::PathBuf;

use cgmath::Vector3;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    animation::{float_height, scatter_props, FrameClock, Spin},
    assets::{AssetEvent, AssetRole, ModelData},
    config::SceneConfig,
    gfx::{
        camera::CameraManager,
        scene::{ObjectId, Scene, Transform},
    },
    ui::IntroOverlay,
};

/// Size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// A prop instance and how it spins.
#[derive(Debug, Clone, Copy)]
pub struct FloatingProp {
    pub node: ObjectId,
    pub spin: Spin,
}

pub struct Session {
    config: SceneConfig,
    pub scene: Scene,
    pub intro: IntroOverlay,
    main: Option<ObjectId>,
    background: Option<ObjectId>,
    props: Vec<FloatingProp>,
    clock: FrameClock,
    viewport: Viewport,
    rng: StdRng,
}

impl Session {
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let camera_manager = CameraManager::from_config(&config.camera, viewport.aspect());
        let rng = match config.placement.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Self {
            scene: Scene::new(camera_manager),
            intro: IntroOverlay::new(&config.intro),
            main: None,
            background: None,
            props: Vec::new(),
            clock: FrameClock::new(config.float_motion.time_step),
            viewport,
            rng,
            config,
        }
    }

    /// The three loads the scene needs, in request order.
    pub fn asset_requests(&self) -> [(AssetRole, PathBuf); 3] {
        let assets = &self.config.assets;
        [
            (AssetRole::Main, assets.main.clone()),
            (AssetRole::Background, assets.background.clone()),
            (AssetRole::Floating, assets.floating.clone()),
        ]
    }

    /// Adds a finished load to the scene. Failures are logged and dropped.
    pub fn apply_asset(&mut self, event: AssetEvent) {
        let AssetEvent { role, path, result } = event;
        let model = match result {
            Ok(model) => model,
            Err(err) => {
                log::error!("Failed to load {} model: {}", role, err);
                return;
            }
        };

        log::info!(
            "Loaded {} model '{}' ({} meshes, {} triangles)",
            role,
            path.display(),
            model.meshes.len(),
            model.triangle_count()
        );

        match role {
            AssetRole::Main => self.place_main(&model),
            AssetRole::Background => self.place_background(&model),
            AssetRole::Floating => self.place_props(&model),
        }
    }

    fn place_main(&mut self, model: &ModelData) {
        if self.main.is_some() {
            log::warn!("Main model already loaded, ignoring '{}'", model.name);
            return;
        }
        let handle = self.scene.add_model(model);
        let id = self.scene.spawn(&handle);
        if let Some(object) = self.scene.object_mut(id) {
            object.transform.position.y =
                float_height(&self.config.float_motion, self.clock.time());
        }
        self.main = Some(id);
    }

    fn place_background(&mut self, model: &ModelData) {
        if self.background.is_some() {
            log::warn!("Background model already loaded, ignoring '{}'", model.name);
            return;
        }
        let pose = self.config.background;
        let handle = self.scene.add_model(model);
        let id = self.scene.spawn(&handle);
        if let Some(object) = self.scene.object_mut(id) {
            let [rx, ry, rz] = pose.rotation;
            object.transform = Transform::new()
                .with_position(Vector3::from(pose.position))
                .with_euler_xyz(rx, ry, rz)
                .with_uniform_scale(pose.scale);
        }
        self.background = Some(id);
    }

    /// The template itself is registered but never placed; only its clones are.
    fn place_props(&mut self, model: &ModelData) {
        let template = self.scene.add_model(model);

        for placement in scatter_props(&mut self.rng, &self.config.placement) {
            let node = self.scene.spawn(&template);
            if let Some(object) = self.scene.object_mut(node) {
                object.transform = placement.transform;
            }
            log::debug!(
                "Placed prop at {:?} (axis {:?}, speed {:.4})",
                placement.transform.position,
                placement.spin.axis,
                placement.spin.speed
            );
            self.props.push(FloatingProp {
                node,
                spin: placement.spin,
            });
        }
    }

    /// One frame update: clock, main object float, prop spins, camera.
    ///
    /// Returns whether the camera moved.
    pub fn tick(&mut self) -> bool {
        let time = self.clock.tick();

        if let Some(main) = self.main.and_then(|id| self.scene.object_mut(id)) {
            main.transform.position.y = float_height(&self.config.float_motion, time);
        }

        for prop in &self.props {
            if let Some(object) = self.scene.object_mut(prop.node) {
                prop.spin.apply(&mut object.transform);
            }
        }

        self.scene.camera_manager.update()
    }

    /// Records the new surface size and updates the camera aspect to match.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        self.viewport = Viewport::new(width, height, scale_factor);
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
    }

    pub fn floating_props(&self) -> &[FloatingProp] {
        &self.props
    }

    pub fn main_object(&self) -> Option<ObjectId> {
        self.main
    }

    pub fn background_object(&self) -> Option<ObjectId> {
        self.background
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assets::MeshData, error::AssetLoadError};
    use cgmath::{InnerSpace, Rotation};

    fn quad(name: &str) -> ModelData {
        ModelData {
            name: name.to_string(),
            meshes: vec![MeshData {
                positions: vec![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [1.0, 1.0, 0.0],
                    [0.0, 1.0, 0.0],
                ],
                normals: vec![[0.0, 0.0, 1.0]; 4],
                indices: vec![0, 1, 2, 0, 2, 3],
                base_color: [1.0; 4],
            }],
        }
    }

    fn loaded(role: AssetRole, name: &str) -> AssetEvent {
        AssetEvent {
            role,
            path: PathBuf::from(format!("{name}.glb")),
            result: Ok(quad(name)),
        }
    }

    fn session() -> Session {
        let mut config = SceneConfig::default();
        config.placement.seed = Some(3);
        Session::new(config, Viewport::new(1200, 800, 1.0))
    }

    #[test]
    fn test_props_appear_only_after_template_load() {
        let mut session = session();
        assert!(session.floating_props().is_empty());

        session.apply_asset(loaded(AssetRole::Floating, "marshmallow"));
        assert_eq!(session.floating_props().len(), 15);
        // Template registered, clones placed, template itself not drawn
        assert_eq!(session.scene.objects().count(), 15);
    }

    #[test]
    fn test_failed_template_load_places_nothing() {
        let mut session = session();
        session.apply_asset(AssetEvent {
            role: AssetRole::Floating,
            path: PathBuf::from("marshmallow.glb"),
            result: Err(AssetLoadError::UnsupportedFormat {
                path: PathBuf::from("marshmallow.glb"),
            }),
        });
        assert!(session.floating_props().is_empty());
        assert_eq!(session.scene.objects().count(), 0);
    }

    #[test]
    fn test_main_object_floats() {
        let mut session = session();
        session.apply_asset(loaded(AssetRole::Main, "marshmallko"));
        let main = session.main_object().unwrap();

        for _ in 0..37 {
            session.tick();
        }
        let t = session.time();
        let expected = 0.1 + (t * 1.5).sin() * 0.07;
        let y = session.scene.object(main).unwrap().transform.position.y;
        assert!((y as f64 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_background_pose() {
        let mut session = session();
        session.apply_asset(loaded(AssetRole::Background, "barn"));
        let id = session.background_object().unwrap();
        let transform = session.scene.object(id).unwrap().transform;
        assert_eq!(transform.position, Vector3::new(0.0, -0.5, 0.0));
        assert_eq!(transform.scale, Vector3::new(1.0, 1.0, 1.0));

        session.tick();
        let after = session.scene.object(id).unwrap().transform;
        assert_eq!(transform, after);
    }

    #[test]
    fn test_prop_rotation_accumulates() {
        let mut session = session();
        session.apply_asset(loaded(AssetRole::Floating, "marshmallow"));
        let prop = session.floating_props()[0];
        let start = session.scene.object(prop.node).unwrap().transform.rotation;

        for _ in 0..10 {
            session.tick();
        }

        let now = session.scene.object(prop.node).unwrap().transform.rotation;
        // Ten increments about the same axis compose into one larger turn
        let delta = start.invert() * now;
        let angle = delta.s.clamp(-1.0, 1.0).acos() * 2.0;
        assert!((angle - 10.0 * prop.spin.speed).abs() < 1e-3);
        assert!((delta.v.normalize() - prop.spin.axis).magnitude() < 1e-3);
    }

    #[test]
    fn test_resize_updates_viewport_and_aspect() {
        let mut session = session();
        session.resize(1000, 500, 2.0);
        assert_eq!(session.viewport(), Viewport::new(1000, 500, 2.0));
        assert!((session.scene.camera_manager.camera.aspect - 2.0).abs() < 1e-6);
    }
}
