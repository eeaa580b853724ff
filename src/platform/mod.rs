//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (mouse and touch filtering)

pub mod input;

pub use input::{Gesture, PointerFilter, PointerSource, RawPointer};
