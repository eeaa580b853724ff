//! Collision detection and response for drawn lines
//!
//! Balls are circles, lines are polylines. A hit pushes the ball out of the
//! segment and turns its velocity into a slide along the segment.

use glam::Vec2;

use super::state::{Ball, Line};

/// Contact between a ball and one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentContact {
    /// Closest point on the segment
    pub point: Vec2,
    /// Unit vector from the contact point toward the ball center
    pub normal: Vec2,
    /// Overlap depth (radius - distance)
    pub penetration: f32,
    /// Unit segment direction; None for a zero-length segment
    pub direction: Option<Vec2>,
}

/// Closest point on segment `a`-`b` to `p`, with its clamped parameter t.
///
/// A zero-length segment degenerates to the point `a`.
#[inline]
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> (Vec2, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (a, 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Distance from `p` to segment `a`-`b`
#[inline]
pub fn distance_to_segment(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let (closest, _) = closest_point_on_segment(a, b, p);
    p.distance(closest)
}

/// Check a ball against one segment
///
/// `vel` only matters when the center lies exactly on the segment: the
/// perpendicular facing against the motion is used as the push-out normal.
pub fn ball_segment_contact(
    center: Vec2,
    radius: f32,
    vel: Vec2,
    a: Vec2,
    b: Vec2,
) -> Option<SegmentContact> {
    let (closest, _t) = closest_point_on_segment(a, b, center);
    let offset = center - closest;
    let dist = offset.length();

    if dist >= radius {
        return None;
    }

    let direction = (b - a).try_normalize();

    let normal = if dist > 0.0 {
        offset / dist
    } else {
        fallback_normal(direction, vel)
    };

    Some(SegmentContact {
        point: closest,
        normal,
        penetration: radius - dist,
        direction,
    })
}

/// Push-out direction when the ball center lies exactly on the segment.
///
/// Faces against the motion; a resting ball is pushed up, against gravity.
fn fallback_normal(direction: Option<Vec2>, vel: Vec2) -> Vec2 {
    let Some(dir) = direction else {
        return Vec2::NEG_Y;
    };
    let perp = dir.perp();
    let facing = perp.dot(vel);
    if facing > 0.0 || (facing == 0.0 && perp.y > 0.0) {
        -perp
    } else {
        perp
    }
}

/// Push the ball out and convert its motion into a slide along the segment
pub fn resolve_segment_contact(ball: &mut Ball, contact: &SegmentContact, line_friction: f32) {
    ball.pos += contact.normal * contact.penetration;

    match contact.direction {
        Some(dir) => {
            let along = ball.vel.dot(dir);
            ball.vel = dir * along * line_friction;
        }
        None => {
            // Point obstacle: drop the component driving into it
            let into = ball.vel.dot(contact.normal);
            if into < 0.0 {
                ball.vel -= contact.normal * into;
            }
        }
    }
}

/// Test a ball against every segment of a line, resolving only the first hit
///
/// Returns true if the ball touched the line.
pub fn collide_ball_with_line(ball: &mut Ball, line: &Line, line_friction: f32) -> bool {
    for (a, b) in line.segments() {
        if let Some(contact) = ball_segment_contact(ball.pos, ball.radius, ball.vel, a, b) {
            resolve_segment_contact(ball, &contact, line_friction);
            return true;
        }
    }
    false
}

/// Whether two balls overlap (strictly closer than the sum of radii)
#[inline]
pub fn balls_touching(a: &Ball, b: &Ball) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}
