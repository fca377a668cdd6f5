//! Core rendering functionality
//!
//! Handles render pipelines, the offscreen scene pass and the composite pass.

pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
