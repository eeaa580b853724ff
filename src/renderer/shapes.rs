//! Shape generation for 2D primitives
//!
//! Everything is built in canvas pixel space (origin top-left, y down) and
//! converted to clip space once per frame.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::GameState;

/// Triangles per ball
pub const BALL_SEGMENTS: u32 = 32;

/// Generate vertices for a stroked polyline (one quad per segment).
///
/// A single point is drawn as a dot of the stroke width.
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    match points {
        [] => Vec::new(),
        [p] => circle(*p, width * 0.5, color, 8),
        _ => {
            let half = width * 0.5;
            let mut vertices = Vec::with_capacity((points.len() - 1) * 6);

            for w in points.windows(2) {
                let (p1, p2) = (w[0], w[1]);

                // Duplicate points contribute nothing
                let Some(dir) = (p2 - p1).try_normalize() else {
                    continue;
                };
                let perp = dir.perp() * half;

                let v1a = p1 + perp;
                let v1b = p1 - perp;
                let v2a = p2 + perp;
                let v2b = p2 - perp;

                // Two triangles
                vertices.push(Vertex::new(v1a.x, v1a.y, color));
                vertices.push(Vertex::new(v1b.x, v1b.y, color));
                vertices.push(Vertex::new(v2a.x, v2a.y, color));

                vertices.push(Vertex::new(v2a.x, v2a.y, color));
                vertices.push(Vertex::new(v1b.x, v1b.y, color));
                vertices.push(Vertex::new(v2b.x, v2b.y, color));
            }

            vertices
        }
    }
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// All foreground geometry for one frame: lines first, balls on top
pub fn scene(state: &GameState, line_width: f32) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for line in &state.lines {
        vertices.extend(polyline(line.points(), line_width, colors::LINE));
    }

    for ball in &state.balls {
        vertices.extend(circle(
            ball.pos,
            ball.radius,
            colors::ball(ball.color),
            BALL_SEGMENTS,
        ));
    }

    vertices
}

/// Canvas pixels to clip space (-1..1, y up)
#[inline]
pub fn canvas_to_ndc(p: [f32; 2], size: (u32, u32)) -> [f32; 2] {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    [p[0] / w * 2.0 - 1.0, 1.0 - p[1] / h * 2.0]
}
