use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rewind::runtime::{AppEvent, Clock, FixedTicker, ManualClock, Runner, TestEventSource};
use rewind::{Device, EventKind, PlaybackStatus, Player, ReplayEvent, Session};

fn fixture() -> Session {
    Session {
        id: "session-1".to_string(),
        user_id: "user-1".to_string(),
        device: Device::Desktop,
        browser: "Chrome".to_string(),
        duration_secs: 1,
        start_time: "2024-03-01T10:00:00Z".to_string(),
        events: vec![
            ReplayEvent::new(EventKind::Move, 10.0, 10.0, 0),
            ReplayEvent::new(EventKind::Click, 50.0, 40.0, 200),
            ReplayEvent::new(EventKind::Scroll, 50.0, 60.0, 250),
            ReplayEvent::new(EventKind::Click, 70.0, 60.0, 300),
            ReplayEvent::new(EventKind::Move, 80.0, 90.0, 400),
        ],
        conversion_success: true,
        landing_page: "/".to_string(),
        exit_page: "/checkout".to_string(),
        content_snapshot: None,
    }
}

// Headless replay using the internal runtime + Player without a TTY.
// Ticks advance a manual clock by one 16ms frame each.
#[test]
fn headless_replay_runs_to_completion() {
    let mut player = Player::new(fixture());
    let clock = ManualClock::new(1_000.0);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let runner = Runner::new(es, ticker);

    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)))
        .unwrap();

    for _ in 0..200u32 {
        match runner.step() {
            AppEvent::Tick => {
                clock.advance(16.0);
                player.tick(clock.now_ms());
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if key.code == KeyCode::Char(' ') {
                    player.toggle(clock.now_ms());
                }
            }
        }
        if player.status() == PlaybackStatus::Completed {
            break;
        }
    }

    assert_eq!(player.status(), PlaybackStatus::Completed);
    assert_eq!(player.progress_percent(), 100.0);
    assert_eq!(player.current_time_ms(), 400.0);
    assert_eq!(player.current_event().map(|e| e.timestamp), Some(400));
    // both clicks were visualized exactly once
    let xs: Vec<f64> = player.clicks().iter().map(|c| c.x).collect();
    assert_eq!(xs, vec![50.0, 70.0]);
}

#[test]
fn headless_pause_and_seek_mid_playback() {
    let mut player = Player::new(fixture());
    let clock = ManualClock::new(0.0);

    player.play(clock.now_ms());
    for _ in 0..10 {
        clock.advance(16.0);
        player.tick(clock.now_ms());
    }
    assert_eq!(player.current_time_ms(), 160.0);

    player.pause();
    clock.advance(5_000.0);
    player.tick(clock.now_ms());
    assert_eq!(player.current_time_ms(), 160.0);
    assert_eq!(player.status(), PlaybackStatus::Paused);

    player.play(clock.now_ms());
    player.seek(75.0, clock.now_ms());
    assert_eq!(player.current_time_ms(), 300.0);
    assert_eq!(player.current_event().map(|e| e.kind), Some(EventKind::Click));
    assert!(player.clicks().is_empty());

    clock.advance(16.0);
    player.tick(clock.now_ms());
    assert_eq!(player.current_time_ms(), 316.0);
    // the click at the seek target is visualized on the next frame
    assert_eq!(player.clicks().len(), 1);
}

#[test]
fn headless_restart_after_completion() {
    let mut player = Player::new(fixture());
    player.seek(100.0, 0.0);
    assert_eq!(player.status(), PlaybackStatus::Completed);

    player.play(10.0);
    assert_eq!(player.current_time_ms(), 0.0);
    assert!(player.clicks().is_empty());
    assert_eq!(player.status(), PlaybackStatus::Playing);
}
