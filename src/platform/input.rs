//! Pointer and touch filtering
//!
//! Turns raw browser events into drawing gestures. Only the primary mouse
//! button and single-finger touches start a stroke, and only the stream that
//! started a stroke may continue or end it.

use glam::Vec2;

/// Primary (left) mouse button as reported by `MouseEvent.button`
pub const PRIMARY_BUTTON: i16 = 0;

/// Which device owns the current stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Raw pointer events in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPointer {
    MouseDown { button: i16, pos: Vec2 },
    MouseMove { pos: Vec2 },
    MouseUp,
    /// `touches` is the number of fingers currently down
    TouchStart { touches: u32, pos: Vec2 },
    /// Position of the first active touch
    TouchMove { pos: Vec2 },
    TouchEnd,
    TouchCancel,
}

/// Drawing gestures fed to the sketch state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Start(Vec2),
    Move(Vec2),
    End,
}

#[derive(Debug, Clone, Default)]
pub struct PointerFilter {
    active: Option<PointerSource>,
}

impl PointerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<PointerSource> {
        self.active
    }

    /// Forget any stroke in progress
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn filter(&mut self, event: RawPointer) -> Option<Gesture> {
        match event {
            RawPointer::MouseDown { button, pos } => {
                if button != PRIMARY_BUTTON || self.active.is_some() {
                    return None;
                }
                self.active = Some(PointerSource::Mouse);
                Some(Gesture::Start(pos))
            }
            RawPointer::TouchStart { touches, pos } => {
                if touches != 1 || self.active.is_some() {
                    return None;
                }
                self.active = Some(PointerSource::Touch);
                Some(Gesture::Start(pos))
            }
            RawPointer::MouseMove { pos } => {
                (self.active == Some(PointerSource::Mouse)).then_some(Gesture::Move(pos))
            }
            RawPointer::TouchMove { pos } => {
                (self.active == Some(PointerSource::Touch)).then_some(Gesture::Move(pos))
            }
            RawPointer::MouseUp => self.end(PointerSource::Mouse),
            RawPointer::TouchEnd | RawPointer::TouchCancel => self.end(PointerSource::Touch),
        }
    }

    fn end(&mut self, source: PointerSource) -> Option<Gesture> {
        if self.active != Some(source) {
            return None;
        }
        self.active = None;
        Some(Gesture::End)
    }
}
