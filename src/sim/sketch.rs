//! Line drawing state machine
//!
//! Idle -> Drawing on gesture start (new one-point line), Drawing -> Drawing
//! on move (append), Drawing -> Idle on end or cancel (line complete).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sketch {
    #[default]
    Idle,
    Drawing,
}

impl Sketch {
    pub fn is_drawing(&self) -> bool {
        *self == Sketch::Drawing
    }

    /// Start a new line at `p`. Ignored while a line is already being drawn.
    pub fn begin(&mut self, state: &mut GameState, p: Vec2) -> bool {
        if self.is_drawing() {
            return false;
        }
        state.lines.push(Line::new(p));
        *self = Sketch::Drawing;
        log::debug!("Line {} started at ({:.0}, {:.0})", state.lines.len() - 1, p.x, p.y);
        true
    }

    /// Append `p` to the line being drawn
    pub fn extend(&mut self, state: &mut GameState, p: Vec2) -> bool {
        if !self.is_drawing() {
            return false;
        }
        match state.active_line_mut() {
            Some(line) => {
                line.push(p);
                true
            }
            None => {
                // Lines were replaced under us (reset mid-drag)
                *self = Sketch::Idle;
                false
            }
        }
    }

    /// Finish the line being drawn (gesture end or cancel)
    pub fn finish(&mut self, state: &mut GameState) -> bool {
        if !self.is_drawing() {
            return false;
        }
        *self = Sketch::Idle;
        match state.active_line_mut() {
            Some(line) => {
                line.complete = true;
                log::debug!("Line finished with {} points", line.points().len());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_stroke() {
        let mut state = GameState::new(800.0, 600.0);
        let mut sketch = Sketch::default();

        assert!(sketch.begin(&mut state, Vec2::new(10.0, 10.0)));
        assert!(sketch.is_drawing());
        assert!(sketch.extend(&mut state, Vec2::new(20.0, 12.0)));
        assert!(sketch.extend(&mut state, Vec2::new(30.0, 15.0)));
        assert!(sketch.finish(&mut state));

        assert_eq!(sketch, Sketch::Idle);
        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.lines[0].points().len(), 3);
        assert!(state.lines[0].complete);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut state = GameState::new(800.0, 600.0);
        let mut sketch = Sketch::default();
        assert!(!sketch.extend(&mut state, Vec2::ONE));
        assert!(!sketch.finish(&mut state));
        assert!(state.lines.is_empty());
    }

    #[test]
    fn test_second_begin_while_drawing_is_ignored() {
        let mut state = GameState::new(800.0, 600.0);
        let mut sketch = Sketch::default();
        sketch.begin(&mut state, Vec2::ZERO);
        assert!(!sketch.begin(&mut state, Vec2::ONE));
        assert_eq!(state.lines.len(), 1);
    }

    #[test]
    fn test_only_last_line_incomplete() {
        let mut state = GameState::new(800.0, 600.0);
        let mut sketch = Sketch::default();
        for i in 0..3 {
            sketch.begin(&mut state, Vec2::splat(i as f32));
            sketch.finish(&mut state);
        }
        sketch.begin(&mut state, Vec2::splat(9.0));
        let incomplete = state.lines.iter().filter(|l| !l.complete).count();
        assert_eq!(incomplete, 1);
        assert!(!state.lines.last().unwrap().complete);
    }

    #[test]
    fn test_reset_mid_drag_drops_to_idle() {
        let mut state = GameState::new(800.0, 600.0);
        let mut sketch = Sketch::default();
        sketch.begin(&mut state, Vec2::ZERO);
        state = GameState::new(800.0, 600.0);
        assert!(!sketch.extend(&mut state, Vec2::ONE));
        assert_eq!(sketch, Sketch::Idle);
        assert!(state.lines.is_empty());
    }
}
