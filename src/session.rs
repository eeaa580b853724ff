//! Session control and the fixed-step run loop
//!
//! A `Session` owns everything that changes while playing: the simulation
//! state, the sketch in progress, the status text and the audio backend.
//! The browser calls `advance` once per animation frame and stops
//! rescheduling when it returns `FrameOutcome::Won`.

use glam::Vec2;

use crate::audio::SoundPlayer;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT, STATUS_PROMPT, STATUS_WON};
use crate::platform::input::{Gesture, PointerFilter, RawPointer};
use crate::sim::{GameEvent, GameState, Sketch, tick};
use crate::tuning::Tuning;

/// What the frame loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame
    Continue,
    /// The balls touched; stop scheduling until reset
    Won,
}

pub struct Session<A: SoundPlayer> {
    state: GameState,
    sketch: Sketch,
    pointer: PointerFilter,
    tuning: Tuning,
    audio: A,
    status: String,
    accumulator: f32,
    running: bool,
    /// Set by `start`; resets before that are ignored
    started: bool,
}

impl<A: SoundPlayer> Session<A> {
    /// Create a session for a playfield of the given size.
    ///
    /// Nothing runs until `start`.
    pub fn new(width: f32, height: f32, tuning: Tuning, audio: A) -> Self {
        Self {
            state: GameState::new(width, height),
            sketch: Sketch::Idle,
            pointer: PointerFilter::new(),
            tuning,
            audio,
            status: STATUS_PROMPT.to_string(),
            accumulator: 0.0,
            running: false,
            started: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_drawing(&self) -> bool {
        self.sketch.is_drawing()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// First start, once the page assets are ready. Same as `reset` afterwards.
    pub fn start(&mut self) -> bool {
        self.started = true;
        self.reset()
    }

    /// Start over: fresh balls, no lines, prompt text, music from the top.
    ///
    /// Returns true when the frame loop is stopped and must be scheduled
    /// again (after a win). A reset while the loop is live must not schedule
    /// a second loop, and a reset before `start` does nothing.
    pub fn reset(&mut self) -> bool {
        if !self.started {
            log::debug!("Reset before start ignored");
            return false;
        }
        let (width, height) = (self.state.width, self.state.height);
        self.state = GameState::new(width, height);
        self.sketch = Sketch::Idle;
        self.pointer.clear();
        self.status = STATUS_PROMPT.to_string();
        self.accumulator = 0.0;

        self.audio.rewind_music();
        self.audio.play_music();

        let needs_schedule = !self.running;
        self.running = true;
        log::info!("Session reset ({}x{})", width, height);
        needs_schedule
    }

    /// Feed a raw pointer event (canvas coordinates)
    pub fn pointer(&mut self, event: RawPointer) {
        if let Some(gesture) = self.pointer.filter(event) {
            self.gesture(gesture);
        }
    }

    /// Apply a drawing gesture. Ignored while the game is frozen.
    pub fn gesture(&mut self, gesture: Gesture) {
        if !self.running {
            return;
        }
        match gesture {
            Gesture::Start(p) => {
                self.sketch.begin(&mut self.state, p);
            }
            Gesture::Move(p) => {
                self.sketch.extend(&mut self.state, p);
            }
            Gesture::End => {
                self.sketch.finish(&mut self.state);
            }
        }
    }

    /// Convenience for tests and demos: draw a whole stroke at once
    pub fn draw_stroke(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.gesture(Gesture::Start(*first));
        for p in rest {
            self.gesture(Gesture::Move(*p));
        }
        self.gesture(Gesture::End);
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) -> FrameOutcome {
        if !self.running {
            return if self.state.is_won() {
                FrameOutcome::Won
            } else {
                FrameOutcome::Continue
            };
        }

        let events = tick(&mut self.state, &self.tuning);
        self.handle_events(&events);

        if self.state.is_won() {
            FrameOutcome::Won
        } else {
            FrameOutcome::Continue
        }
    }

    /// Advance by a frame's worth of time using fixed ticks
    pub fn advance(&mut self, dt: f32) -> FrameOutcome {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.step() == FrameOutcome::Won {
                return FrameOutcome::Won;
            }
        }

        // Too far behind: drop the backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        if self.state.is_won() {
            FrameOutcome::Won
        } else {
            FrameOutcome::Continue
        }
    }

    /// Headless loop: tick until the balls touch or `max_ticks` runs out.
    ///
    /// Returns the number of ticks it took to win.
    pub fn run_until_won(&mut self, max_ticks: u64) -> Option<u64> {
        for n in 1..=max_ticks {
            if self.step() == FrameOutcome::Won {
                return Some(n);
            }
        }
        None
    }

    fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Won => {
                    self.status = STATUS_WON.to_string();
                    self.audio.pause_music();
                    self.audio.play_win();
                    self.running = false;
                    log::info!("Balls touched after {} ticks", self.state.time_ticks);
                }
                GameEvent::LineContact { .. } | GameEvent::WallBounce { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::sim::GamePhase;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl SoundPlayer for Recorder {
        fn play_music(&mut self) {
            self.calls.push("play");
        }
        fn pause_music(&mut self) {
            self.calls.push("pause");
        }
        fn rewind_music(&mut self) {
            self.calls.push("rewind");
        }
        fn play_win(&mut self) {
            self.calls.push("win");
        }
    }

    fn session() -> Session<Recorder> {
        Session::new(800.0, 600.0, Tuning::default(), Recorder::default())
    }

    fn put_balls_together<A: SoundPlayer>(s: &mut Session<A>) {
        s.state.balls[0].pos = Vec2::new(400.0, 300.0);
        s.state.balls[1].pos = Vec2::new(420.0, 300.0);
    }

    #[test]
    fn test_not_running_before_reset() {
        let mut s = session();
        assert!(!s.is_running());
        assert_eq!(s.step(), FrameOutcome::Continue);
        assert_eq!(s.state().time_ticks, 0);
    }

    #[test]
    fn test_reset_restarts_music_and_requests_schedule_once() {
        let mut s = session();
        assert!(s.start());
        assert_eq!(s.audio().calls, vec!["rewind", "play"]);
        // Already running: no second loop
        assert!(!s.reset());
    }

    #[test]
    fn test_win_stops_loop_and_plays_sound() {
        let mut s = session();
        s.start();
        put_balls_together(&mut s);

        assert_eq!(s.step(), FrameOutcome::Won);
        assert_eq!(s.status(), STATUS_WON);
        assert!(!s.is_running());
        assert_eq!(s.audio().calls, vec!["rewind", "play", "pause", "win"]);

        // Frozen: further steps do nothing
        let ticks = s.state().time_ticks;
        assert_eq!(s.step(), FrameOutcome::Won);
        assert_eq!(s.state().time_ticks, ticks);
    }

    #[test]
    fn test_reset_after_win_requests_schedule() {
        let mut s = session();
        s.start();
        put_balls_together(&mut s);
        s.step();

        assert!(s.reset());
        assert_eq!(s.status(), STATUS_PROMPT);
        assert_eq!(s.state().phase, GamePhase::Playing);
        assert_eq!(s.state().balls[0].pos, Vec2::new(150.0, 500.0));
        assert_eq!(s.state().balls[1].pos, Vec2::new(650.0, 500.0));
        assert!(s.state().lines.is_empty());
    }

    #[test]
    fn test_pointer_draws_line() {
        let mut s = session();
        s.start();
        s.pointer(RawPointer::MouseDown {
            button: 0,
            pos: Vec2::new(10.0, 10.0),
        });
        s.pointer(RawPointer::MouseMove {
            pos: Vec2::new(20.0, 10.0),
        });
        assert!(s.is_drawing());
        s.pointer(RawPointer::MouseUp);
        assert!(!s.is_drawing());
        assert_eq!(s.state().lines.len(), 1);
        assert!(s.state().lines[0].complete);
    }

    #[test]
    fn test_gestures_ignored_while_won() {
        let mut s = session();
        s.start();
        put_balls_together(&mut s);
        s.step();
        s.draw_stroke(&[Vec2::ZERO, Vec2::ONE]);
        assert!(s.state().lines.is_empty());
    }

    #[test]
    fn test_reset_before_start_is_ignored() {
        let mut s = session();
        assert!(!s.reset());
        assert!(!s.is_running());
        assert!(s.audio().calls.is_empty());
        assert_eq!(s.advance(MAX_FRAME_DT), FrameOutcome::Continue);
        assert_eq!(s.state().time_ticks, 0);

        assert!(s.start());
        assert!(s.is_started());
        assert!(s.is_running());
    }

    #[test]
    fn test_advance_at_144hz_keeps_60hz_ticks() {
        let mut s = Session::new(800.0, 600.0, Tuning::default(), SilentAudio);
        s.start();
        let mut idle_frames = 0;
        for _ in 0..144 {
            let before = s.state().time_ticks;
            s.advance(1.0 / 144.0);
            if s.state().time_ticks == before {
                idle_frames += 1;
            }
        }
        // One second of frames runs one second of ticks, not one tick per frame
        let ticks = s.state().time_ticks;
        assert!((59..=60).contains(&ticks), "ticks = {}", ticks);
        assert_eq!(idle_frames, 144 - ticks);
    }

    #[test]
    fn test_advance_runs_fixed_ticks() {
        let mut s = Session::new(800.0, 600.0, Tuning::default(), SilentAudio);
        s.start();
        assert_eq!(s.advance(SIM_DT), FrameOutcome::Continue);
        assert_eq!(s.state().time_ticks, 1);

        // Half a tick accumulates without stepping
        s.advance(SIM_DT * 0.5);
        assert_eq!(s.state().time_ticks, 1);
        s.advance(SIM_DT * 0.6);
        assert_eq!(s.state().time_ticks, 2);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut s = Session::new(800.0, 600.0, Tuning::default(), SilentAudio);
        s.start();
        s.advance(10.0);
        assert_eq!(s.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_advance_stops_on_win() {
        let mut s = session();
        s.start();
        put_balls_together(&mut s);
        assert_eq!(s.advance(MAX_FRAME_DT), FrameOutcome::Won);
        assert_eq!(s.state().time_ticks, 1);
    }
}
