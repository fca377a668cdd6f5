//! # User Interface Module
//!
//! Dear ImGui integration and the intro overlay drawn with it.
//!
//! - [`UiManager`] - ImGui context, winit platform and wgpu renderer
//! - [`IntroOverlay`] - Title screen state machine and its drawing
//!
//! The overlay state is independent of ImGui, so it can be driven and tested
//! without a window.

pub mod intro;
pub mod manager;

// Re-export main types
pub use intro::{IntroOverlay, OverlayState, SurfaceState, TitleState};
pub use manager::UiManager;
