//! Game state and core simulation types
//!
//! Everything the physics step reads or writes lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Balls are moving, player may draw
    #[default]
    Playing,
    /// Balls touched; the simulation is frozen until reset
    Won,
}

/// Ball color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallColor {
    Red,
    Blue,
}

impl BallColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Blue => "blue",
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: BallColor,
}

impl Ball {
    /// Ball at rest at the given position
    pub fn new(pos: Vec2, radius: f32, color: BallColor) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
        }
    }

    /// The two balls in their starting layout
    pub fn initial_pair() -> [Ball; 2] {
        [
            Ball::new(Vec2::from(RED_BALL_START), BALL_RADIUS, BallColor::Red),
            Ball::new(Vec2::from(BLUE_BALL_START), BALL_RADIUS, BallColor::Blue),
        ]
    }

    /// Apply gravity and damping, then move by the new velocity
    pub fn integrate(&mut self, gravity: f32, friction: f32) {
        self.vel.y += gravity;
        self.vel *= friction;
        self.pos += self.vel;
    }

    /// Bounce off the canvas edges. Returns true if any wall was hit.
    pub fn bounce_in_bounds(&mut self, width: f32, height: f32) -> bool {
        let r = self.radius;
        let mut hit = false;

        if self.pos.x - r < 0.0 || self.pos.x + r > width {
            self.vel.x = -self.vel.x;
            // max/min rather than clamp: a canvas narrower than the ball must not panic
            self.pos.x = self.pos.x.min(width - r).max(r);
            hit = true;
        }
        if self.pos.y - r < 0.0 || self.pos.y + r > height {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.min(height - r).max(r);
            hit = true;
        }

        hit
    }
}

/// A freehand line drawn by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Points in drawing order (never empty)
    points: Vec<Vec2>,
    /// Set once the drag gesture ends; complete lines fall
    pub complete: bool,
    /// Vertical velocity while falling
    pub vy: f32,
}

impl Line {
    /// Start a line at its first point
    pub fn new(start: Vec2) -> Self {
        Self {
            points: vec![start],
            complete: false,
            vy: 0.0,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn push(&mut self, p: Vec2) {
        self.points.push(p);
    }

    /// Segments in drawing order. A single-point line yields one zero-length
    /// segment so it still collides as a dot.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let single = (self.points.len() == 1).then(|| (self.points[0], self.points[0]));
        single
            .into_iter()
            .chain(self.points.windows(2).map(|w| (w[0], w[1])))
    }

    /// Rigid fall: gravity, translate every point, then damp
    pub fn fall(&mut self, gravity: f32, friction: f32) {
        self.vy += gravity;
        for p in &mut self.points {
            p.y += self.vy;
        }
        self.vy *= friction;
    }
}

/// Things that happened during a tick (consumed by the session for audio/logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball (by index) bounced off a canvas edge
    WallBounce { ball: usize },
    /// Ball (by index) hit a line (by index)
    LineContact { ball: usize, line: usize },
    /// The balls touched
    Won,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Playfield size in pixels (fixed at load)
    pub width: f32,
    pub height: f32,
    /// Exactly two balls
    pub balls: [Ball; 2],
    /// Lines in creation order; only the last one may be incomplete
    pub lines: Vec<Line>,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh state for a playfield of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            balls: Ball::initial_pair(),
            lines: Vec::new(),
            phase: GamePhase::Playing,
            time_ticks: 0,
        }
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// The line currently being drawn, if any
    pub fn active_line_mut(&mut self) -> Option<&mut Line> {
        self.lines.last_mut().filter(|l| !l.complete)
    }
}
