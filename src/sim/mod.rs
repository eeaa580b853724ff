//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (balls by index, lines by drawing order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod sketch;
pub mod state;
pub mod tick;

pub use collision::{
    SegmentContact, ball_segment_contact, balls_touching, closest_point_on_segment,
    collide_ball_with_line, distance_to_segment, resolve_segment_contact,
};
pub use sketch::Sketch;
pub use state::{Ball, BallColor, GameEvent, GamePhase, GameState, Line};
pub use tick::tick;
