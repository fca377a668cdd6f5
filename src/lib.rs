// src/lib.rs
//! Mallow
//!
//! A small decorative 3D scene built on wgpu and winit: a bobbing centerpiece,
//! a backdrop, a ring of slowly spinning props and a clamped orbit camera,
//! behind an intro title that clears a blur when clicked.

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod session;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::MallowApp;
pub use config::SceneConfig;
pub use session::Session;

