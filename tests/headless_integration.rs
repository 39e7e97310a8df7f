use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use flick::{
    audio::{AudioSettings, Cue, CuePlayer, RecordingSink},
    runtime::{AppEvent, FixedTicker, Runner, TestEventSource},
    session::{Difficulty, Phase, Session, SessionConfig, SessionEvent},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::layout::Rect;

const AREA: Rect = Rect {
    x: 1,
    y: 2,
    width: 128,
    height: 36,
};

fn left_click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

// Drive a session through Runner/TestEventSource without a TTY: every tick
// advances the clock, every mouse event is mapped through the arena area.
#[test]
fn headless_clicks_register_hits() {
    let config = SessionConfig {
        difficulty: Difficulty::Easy,
        ..SessionConfig::default()
    };
    let arena = config.arena;
    let mut session = Session::new(config, StdRng::seed_from_u64(7));
    let mut audio = CuePlayer::new(AudioSettings::default(), RecordingSink::default());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    let events = session.start();
    audio.handle(&events);

    for _ in 0..3 {
        let events = session.tick(100);
        audio.handle(&events);

        let target = session.targets()[0];
        let (col, row) = arena.cells_within(AREA, target.position, 20.0)[0];
        tx.send(AppEvent::Mouse(left_click(col, row))).unwrap();

        match runner.step() {
            AppEvent::Mouse(mouse) => {
                let point = arena.cell_to_point(AREA, mouse.column, mouse.row).unwrap();
                let hit = session.click(point).expect("click should land on the target");
                audio.handle(&[hit]);
            }
            other => panic!("expected mouse event, got {other:?}"),
        }
    }

    assert_eq!(session.hits(), 3);
    assert_eq!(session.events()[0].reaction_time_ms, 100);
    assert!(session
        .events()
        .iter()
        .all(|e| e.miss_distance_px <= 20.0));

    let clicks = audio
        .sink()
        .played
        .iter()
        .filter(|(cue, _)| *cue == Cue::Click)
        .count();
    assert_eq!(clicks, 3);
}

#[test]
fn headless_click_outside_arena_is_ignored() {
    let config = SessionConfig::default();
    let arena = config.arena;
    let mut session = Session::new(config, StdRng::seed_from_u64(1));
    session.start();

    assert_eq!(arena.cell_to_point(AREA, 0, 0), None);
    assert_eq!(session.click(arena.cell_to_point(AREA, 1, 2).unwrap()), None);
    assert_eq!(session.hits(), 0);
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let config = SessionConfig {
        duration_ms: 200,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config, StdRng::seed_from_u64(3));
    session.start();

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    let mut game_over = None;
    for _ in 0..50u32 {
        if let AppEvent::Tick = runner.step() {
            for event in session.tick(10) {
                if let SessionEvent::GameOver { hits, missed } = event {
                    game_over = Some((hits, missed));
                }
            }
        }
        if session.phase() == Phase::GameOver {
            break;
        }
    }

    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.remaining_ms(), 0);
    assert_eq!(game_over, Some((0, 0)));
    assert_eq!(session.summary(), None);
}
