//! Fixed timestep simulation tick
//!
//! Advances balls and lines by one step, then checks for the win.

use super::collision::{balls_touching, collide_ball_with_line};
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Advance the game state by one fixed tick
///
/// Does nothing once the game is won. Returns what happened this tick.
pub fn tick(state: &mut GameState, tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::Won {
        return events;
    }

    state.time_ticks += 1;

    for (i, ball) in state.balls.iter_mut().enumerate() {
        ball.integrate(tuning.gravity, tuning.friction);

        // In-progress lines collide too
        for (j, line) in state.lines.iter().enumerate() {
            if collide_ball_with_line(ball, line, tuning.line_friction) {
                events.push(GameEvent::LineContact { ball: i, line: j });
            }
        }

        // Walls last so no line push can leave the ball outside the canvas
        if ball.bounce_in_bounds(state.width, state.height) {
            events.push(GameEvent::WallBounce { ball: i });
        }
    }

    for line in state.lines.iter_mut().filter(|l| l.complete) {
        line.fall(tuning.gravity, tuning.friction);
    }

    if balls_touching(&state.balls[0], &state.balls[1]) {
        state.phase = GamePhase::Won;
        events.push(GameEvent::Won);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, BallColor, Line};
    use glam::Vec2;

    fn empty_state() -> GameState {
        GameState::new(800.0, 600.0)
    }

    #[test]
    fn test_tick_applies_gravity() {
        let mut state = empty_state();
        let events = tick(&mut state, &Tuning::default());
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 1);
        for ball in &state.balls {
            assert!((ball.vel.y - 1.8).abs() < 1e-5);
            assert!((ball.pos.y - 501.8).abs() < 1e-4);
        }
    }

    #[test]
    fn test_floor_bounce_flips_velocity_on_contact_tick() {
        let mut state = empty_state();
        state.balls[0].pos = Vec2::new(150.0, 580.0);
        state.balls[0].vel = Vec2::new(0.0, 10.0);

        let events = tick(&mut state, &Tuning::default());

        assert!(events.contains(&GameEvent::WallBounce { ball: 0 }));
        assert!(state.balls[0].vel.y < 0.0);
        assert_eq!(state.balls[0].pos.y, 585.0);
    }

    #[test]
    fn test_no_flip_before_contact() {
        let mut state = empty_state();
        state.balls[0].pos = Vec2::new(150.0, 300.0);
        state.balls[0].vel = Vec2::new(0.0, 10.0);
        let events = tick(&mut state, &Tuning::default());
        assert!(!events.contains(&GameEvent::WallBounce { ball: 0 }));
        assert!(state.balls[0].vel.y > 0.0);
    }

    #[test]
    fn test_complete_lines_fall_incomplete_do_not() {
        let mut state = empty_state();
        let mut done = Line::new(Vec2::new(300.0, 100.0));
        done.push(Vec2::new(400.0, 100.0));
        done.complete = true;
        let mut drawing = Line::new(Vec2::new(300.0, 200.0));
        drawing.push(Vec2::new(400.0, 200.0));
        state.lines.push(done);
        state.lines.push(drawing);

        tick(&mut state, &Tuning::default());

        assert_eq!(state.lines[0].points()[0].y, 102.0);
        assert_eq!(state.lines[1].points()[0].y, 200.0);
    }

    #[test]
    fn test_ball_rides_line_contact_event() {
        let mut state = empty_state();
        let mut line = Line::new(Vec2::new(100.0, 512.0));
        line.push(Vec2::new(200.0, 512.0));
        state.lines.push(line);

        let events = tick(&mut state, &Tuning::default());
        assert!(events.contains(&GameEvent::LineContact { ball: 0, line: 0 }));
        // Pushed to rest on top of the line
        assert!((state.balls[0].pos.y - 497.0).abs() < 1e-3);
    }

    #[test]
    fn test_win_when_balls_overlap() {
        let mut state = empty_state();
        state.balls = [
            Ball::new(Vec2::new(400.0, 300.0), 15.0, BallColor::Red),
            Ball::new(Vec2::new(420.0, 300.0), 15.0, BallColor::Blue),
        ];
        let events = tick(&mut state, &Tuning::default());
        assert_eq!(state.phase, GamePhase::Won);
        assert!(events.contains(&GameEvent::Won));
    }

    #[test]
    fn test_no_win_when_apart() {
        let mut state = empty_state();
        state.balls = [
            Ball::new(Vec2::new(400.0, 300.0), 15.0, BallColor::Red),
            Ball::new(Vec2::new(440.0, 300.0), 15.0, BallColor::Blue),
        ];
        tick(&mut state, &Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_won_state_is_frozen() {
        let mut state = empty_state();
        state.phase = GamePhase::Won;
        let before = state.clone();
        assert!(tick(&mut state, &Tuning::default()).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = empty_state();
        let mut state2 = empty_state();
        let mut line = Line::new(Vec2::new(120.0, 540.0));
        line.push(Vec2::new(400.0, 560.0));
        line.complete = true;
        state1.lines.push(line.clone());
        state2.lines.push(line);

        for _ in 0..200 {
            tick(&mut state1, &Tuning::default());
            tick(&mut state2, &Tuning::default());
        }
        assert_eq!(state1, state2);
    }
}
