//! # Graphics Module
//!
//! Camera, scene graph, GPU resources and the render engine.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Damped, clamped orbit camera
//! - **Rendering Pipeline** ([`rendering`]) - Offscreen scene pass plus a blur composite
//! - **Scene Management** ([`scene`]) - Objects sharing meshes, with quaternion transforms
//! - **Resource Management** ([`resources`]) - Bind group layouts, uniforms and render targets
//!
//! ## Usage
//!
//! ```no_run
//! use mallow::gfx::{RenderEngine, scene::Scene};
//!
//! // Created by the app once the window exists:
//! // let engine = RenderEngine::new(window, width, height, &config.lighting).await?;
//! // engine.prepare(&mut scene);
//! // engine.render_frame(&scene, Some(ui_callback))?;
//! ```

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
