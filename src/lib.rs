//! Doodle Balls - draw lines, get two balls to touch
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, line collisions, win check, sketching)
//! - `session`: Game session control and fixed-step run loop
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input filtering
//! - `audio`: Music and win sound behind a small media interface
//! - `tuning`: Data-driven physics constants
//! - `settings`: Player preferences

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::DoodleError;
pub use session::{FrameOutcome, Session};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Physics constants are tuned per tick at 60 Hz.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const RED_BALL_START: (f32, f32) = (150.0, 500.0);
    pub const BLUE_BALL_START: (f32, f32) = (650.0, 500.0);

    /// Physics defaults (per tick)
    pub const GRAVITY: f32 = 2.0;
    pub const FRICTION: f32 = 0.90;
    /// Along-line speed multiplier after a line contact (>1 speeds the ball up)
    pub const LINE_FRICTION: f32 = 3.0;

    /// Line stroke width in pixels
    pub const LINE_WIDTH: f32 = 2.0;

    /// Status texts
    pub const STATUS_PROMPT: &str = "Draw lines to make the balls touch!";
    pub const STATUS_WON: &str = "You Win! The balls touched!";
}

/// Convert a client-space pointer position to canvas-local coordinates
#[inline]
pub fn client_to_canvas(client: Vec2, canvas_origin: Vec2) -> Vec2 {
    client - canvas_origin
}
