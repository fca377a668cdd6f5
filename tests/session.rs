//! End-to-end session behavior with real model files and the background
//! loader, no window or GPU involved.

use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};

use futures::executor::block_on;
use mallow::{
    assets::{AssetQueue, AssetRole},
    config::SceneConfig,
    session::{Session, Viewport},
    ui::{OverlayState, SurfaceState, TitleState},
};

const CUBE_OBJ: &str = "\
o cube
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 4 8 7
f 4 7 3
f 1 5 8
f 1 8 4
f 2 3 7
f 2 7 6
";

struct TempModels {
    dir: PathBuf,
}

impl TempModels {
    fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("mallow-it-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.obj"), CUBE_OBJ).unwrap();
        fs::write(dir.join("barn.obj"), CUBE_OBJ).unwrap();
        fs::write(dir.join("prop.obj"), CUBE_OBJ).unwrap();
        Self { dir }
    }

    fn config(&self) -> SceneConfig {
        let mut config = SceneConfig::default();
        config.assets.main = self.dir.join("main.obj");
        config.assets.background = self.dir.join("barn.obj");
        config.assets.floating = self.dir.join("prop.obj");
        config.placement.seed = Some(11);
        config
    }
}

impl Drop for TempModels {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.dir).ok();
    }
}

fn load_all(session: &mut Session) {
    let mut queue = AssetQueue::new().unwrap();
    for (role, path) in session.asset_requests() {
        queue.request(role, path);
    }
    while queue.pending() > 0 {
        let event = block_on(queue.next_event()).unwrap();
        session.apply_asset(event);
    }
}

#[test]
fn test_scene_populates_from_loaded_models() {
    let models = TempModels::new("populate");
    let mut session = Session::new(models.config(), Viewport::new(1200, 800, 1.0));
    assert!(session.floating_props().is_empty());
    assert!(session.main_object().is_none());

    load_all(&mut session);

    assert_eq!(session.floating_props().len(), 15);
    assert!(session.main_object().is_some());
    assert!(session.background_object().is_some());
    // main + background + 15 clones; the prop template is never placed
    assert_eq!(session.scene.objects().count(), 17);

    let stats = session.scene.get_statistics();
    assert_eq!(stats.mesh_count, 3);
    assert_eq!(stats.total_triangles, 17 * 12);
}

#[test]
fn test_missing_template_leaves_no_props() {
    let models = TempModels::new("missing");
    let mut config = models.config();
    config.assets.floating = models.dir.join("nope.glb");

    let mut session = Session::new(config, Viewport::new(1200, 800, 1.0));
    load_all(&mut session);

    assert!(session.floating_props().is_empty());
    assert!(session.main_object().is_some());
    assert_eq!(session.scene.objects().count(), 2);
}

#[test]
fn test_ticks_move_main_and_keep_camera_clamped() {
    let models = TempModels::new("ticks");
    let mut session = Session::new(models.config(), Viewport::new(1200, 800, 1.0));
    load_all(&mut session);

    let main = session.main_object().unwrap();
    {
        let camera = &mut session.scene.camera_manager.camera;
        camera.rotate_left(50.0);
        camera.rotate_up(-50.0);
        camera.dolly_out(100.0);
    }

    for _ in 0..500 {
        session.tick();
        let camera = &session.scene.camera_manager.camera;
        assert!(camera.bounds.contains(camera));
    }

    let t = session.time();
    assert!((t - 5.0).abs() < 1e-6);
    let y = session.scene.object(main).unwrap().transform.position.y as f64;
    assert!((y - (0.1 + (t * 1.5).sin() * 0.07)).abs() < 1e-6);
}

#[test]
fn test_intro_and_resize() {
    let mut session = Session::new(SceneConfig::default(), Viewport::new(1200, 800, 1.0));

    session.resize(640, 480, 1.5);
    assert_eq!(session.viewport(), Viewport::new(640, 480, 1.5));
    assert!((session.scene.camera_manager.camera.aspect - 640.0 / 480.0).abs() < 1e-6);

    let start = Instant::now();
    assert!(session.intro.activate(start));
    assert_eq!(session.intro.title_state(), TitleState::Hidden);
    assert_eq!(session.intro.surface_state(), SurfaceState::Clear);

    session.intro.update(start + Duration::from_millis(600));
    assert_eq!(session.intro.overlay_state(), OverlayState::Shown);
    session.intro.update(start + Duration::from_millis(1200));
    assert_eq!(session.intro.overlay_state(), OverlayState::Removed);
}

#[test]
fn test_role_labels() {
    assert_eq!(AssetRole::Floating.to_string(), "floating");
}
