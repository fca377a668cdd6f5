//! Prop placement and per-tick motion.

pub mod float_motion;
pub mod placement;

pub use float_motion::{float_height, FrameClock};
pub use placement::{scatter_props, PropPlacement, Spin};
