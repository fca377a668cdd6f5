//! # Mallow Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use mallow::prelude::*;
//!
//! let mut session = Session::new(SceneConfig::default(), Viewport::new(1200, 800, 1.0));
//! session.tick();
//! ```

// Application and session
pub use crate::app::MallowApp;
pub use crate::session::{FloatingProp, Session, Viewport};

// Configuration and errors
pub use crate::config::{ClampPreset, SceneConfig};
pub use crate::error::{AssetLoadError, ConfigError, RenderError};

// Assets
pub use crate::assets::{load_model, AssetEvent, AssetQueue, AssetRole, ModelData};

// Scene and camera
pub use crate::gfx::camera::{CameraManager, OrbitCamera};
pub use crate::gfx::scene::{ObjectId, Scene, Transform};
pub use crate::ui::IntroOverlay;

// Common external types
pub use cgmath::{InnerSpace, Vector3};
