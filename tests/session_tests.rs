use doodle_balls::audio::SilentAudio;
use doodle_balls::consts::{BALL_RADIUS, STATUS_PROMPT, STATUS_WON};
use doodle_balls::platform::{Gesture, RawPointer};
use doodle_balls::sim::GamePhase;
use doodle_balls::{FrameOutcome, Session, Tuning};
use glam::Vec2;

fn session() -> Session<SilentAudio> {
    let mut s = Session::new(800.0, 600.0, Tuning::default(), SilentAudio);
    s.start();
    s
}

#[test]
fn reset_restores_initial_layout() {
    let mut s = session();
    s.draw_stroke(&[Vec2::new(100.0, 520.0), Vec2::new(300.0, 560.0)]);
    s.gesture(Gesture::Start(Vec2::new(500.0, 300.0)));
    s.gesture(Gesture::Move(Vec2::new(520.0, 310.0)));
    for _ in 0..90 {
        s.step();
    }

    s.reset();

    let state = s.state();
    assert!(state.lines.is_empty());
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.time_ticks, 0);
    assert_eq!(state.balls[0].pos, Vec2::new(150.0, 500.0));
    assert_eq!(state.balls[1].pos, Vec2::new(650.0, 500.0));
    assert_eq!(state.balls[0].vel, Vec2::ZERO);
    assert_eq!(state.balls[1].vel, Vec2::ZERO);
    assert_eq!(s.status(), STATUS_PROMPT);
    assert!(!s.is_drawing());
}

#[test]
fn reset_waits_for_start() {
    let mut s = Session::new(800.0, 600.0, Tuning::default(), SilentAudio);
    // Reset clicked while the page is still loading
    assert!(!s.reset());
    assert_eq!(s.run_until_won(10), None);
    assert_eq!(s.state().time_ticks, 0);

    assert!(s.start());
    assert!(!s.reset());
    s.step();
    assert_eq!(s.state().time_ticks, 1);
}

#[test]
fn held_line_catches_falling_ball() {
    let mut s = session();
    // Never released, so the line stays put
    s.pointer(RawPointer::MouseDown {
        button: 0,
        pos: Vec2::new(100.0, 530.0),
    });
    s.pointer(RawPointer::MouseMove {
        pos: Vec2::new(200.0, 530.0),
    });

    for _ in 0..200 {
        assert_eq!(s.step(), FrameOutcome::Continue);
    }

    let red = &s.state().balls[0];
    assert!((red.pos.y - (530.0 - BALL_RADIUS)).abs() < 1e-3);
    assert!((red.pos.x - 150.0).abs() < 1e-3);

    // Blue ball has nothing under it and settles near the floor
    let blue = &s.state().balls[1];
    assert!(blue.pos.y > 560.0);
    assert!(blue.pos.y <= 600.0 - BALL_RADIUS);
}

#[test]
fn released_line_falls_away() {
    let mut s = session();
    s.draw_stroke(&[Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)]);
    assert!(s.state().lines[0].complete);

    for _ in 0..60 {
        s.step();
    }

    assert!(s.state().lines[0].points().iter().all(|p| p.y > 600.0));
}

#[test]
fn narrow_playfield_wins_on_first_tick() {
    // Blue ball is clamped against the right wall, right next to red
    let mut s = Session::new(170.0, 600.0, Tuning::default(), SilentAudio);
    assert!(s.start());

    assert_eq!(s.run_until_won(10), Some(1));
    assert_eq!(s.status(), STATUS_WON);
    assert!(!s.is_running());
    assert_eq!(s.state().phase, GamePhase::Won);

    // Frozen until reset
    s.draw_stroke(&[Vec2::ZERO, Vec2::new(50.0, 50.0)]);
    assert!(s.state().lines.is_empty());
    assert_eq!(s.advance(1.0), FrameOutcome::Won);
    assert_eq!(s.state().time_ticks, 1);

    assert!(s.reset());
    assert!(s.is_running());
}

#[test]
fn no_win_without_lines() {
    let mut s = session();
    assert_eq!(s.run_until_won(600), None);
    assert_eq!(s.status(), STATUS_PROMPT);
}

#[test]
fn headless_runs_are_deterministic() {
    let results: Vec<_> = (0..5)
        .map(|_| {
            let mut s = session();
            s.draw_stroke(&[
                Vec2::new(80.0, 540.0),
                Vec2::new(400.0, 580.0),
                Vec2::new(720.0, 540.0),
            ]);
            s.gesture(Gesture::Start(Vec2::new(120.0, 560.0)));
            s.gesture(Gesture::Move(Vec2::new(680.0, 560.0)));
            for _ in 0..240 {
                s.step();
            }
            (s.state().balls, s.state().time_ticks)
        })
        .collect();

    for r in &results[1..] {
        assert_eq!(results[0], *r);
    }
}

#[test]
fn second_touch_does_not_start_line() {
    let mut s = session();
    s.pointer(RawPointer::TouchStart {
        touches: 2,
        pos: Vec2::new(10.0, 10.0),
    });
    assert!(s.state().lines.is_empty());

    s.pointer(RawPointer::TouchStart {
        touches: 1,
        pos: Vec2::new(10.0, 10.0),
    });
    s.pointer(RawPointer::TouchMove {
        pos: Vec2::new(30.0, 10.0),
    });
    s.pointer(RawPointer::TouchCancel);

    assert_eq!(s.state().lines.len(), 1);
    assert_eq!(s.state().lines[0].points().len(), 2);
    assert!(s.state().lines[0].complete);
}
