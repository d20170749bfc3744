use chrono::{TimeZone, Utc};
use rand::{rngs::StdRng, SeedableRng};
use rewind::mock::generate_sessions;
use rewind::stats::SessionStats;
use rewind::store::{load_sessions_json, save_sessions_json, SessionStore};
use rewind::{PlaybackStatus, Player};

/// Integration tests for the session sources: generated sessions flow through
/// JSON files and the SQLite store unchanged and stay replayable.

#[test]
fn generated_sessions_survive_json_and_store() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let sessions = generate_sessions(6, &mut StdRng::seed_from_u64(2024), now);

    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("sessions.json");
    save_sessions_json(&json, &sessions).unwrap();
    let from_json = load_sessions_json(&json).unwrap();
    assert_eq!(from_json, sessions);

    let mut store = SessionStore::open(dir.path().join("sessions.db")).unwrap();
    store.save_all(&from_json).unwrap();
    assert_eq!(store.count().unwrap(), 6);

    let mut listed = store.list().unwrap();
    listed.sort_by(|a, b| a.id.cmp(&b.id));
    let mut expected = sessions.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(listed, expected);

    assert_eq!(
        SessionStats::from_sessions(&listed),
        SessionStats::from_sessions(&sessions)
    );
}

#[test]
fn generated_session_plays_to_the_end() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let session = generate_sessions(1, &mut StdRng::seed_from_u64(5), now).remove(0);
    let expected_clicks = session.click_count();
    let total = session.total_duration_ms();

    let mut player = Player::new(session).with_click_buffer(
        rewind::clicks::ClickBuffer::new(usize::MAX, u64::MAX),
    );
    player.play(0.0);

    // one frame every 5ms is finer than the 20ms minimum event spacing
    let mut now_ms = 0.0;
    while player.is_playing() {
        now_ms += 5.0;
        player.tick(now_ms);
        assert!(now_ms <= total + 10.0, "playback overran the timeline");
    }

    assert_eq!(player.status(), PlaybackStatus::Completed);
    assert_eq!(player.clicks().len(), expected_clicks);
}

#[test]
fn cli_list_and_at_are_headless() {
    let dir = tempfile::tempdir().unwrap();

    let output = assert_cmd::Command::cargo_bin("rewind")
        .unwrap()
        .env("HOME", dir.path())
        .env_remove("XDG_CONFIG_HOME")
        .args(["--seed", "9", "-n", "3", "--list", "--at", "50", "-s", "session-2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("session-1"));
    assert!(stdout.contains("session-3"));
    assert!(stdout.contains("3 sessions"));
    assert!(stdout.contains("session-2 "));
    assert!(stdout.contains("(50.0%)"));
}

#[test]
fn cli_export_then_import_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("out.json");
    let db = dir.path().join("s.db");

    assert_cmd::Command::cargo_bin("rewind")
        .unwrap()
        .env("HOME", dir.path())
        .args(["--seed", "1", "-n", "4", "--export"])
        .arg(&json)
        .assert()
        .success();
    assert_eq!(load_sessions_json(&json).unwrap().len(), 4);

    assert_cmd::Command::cargo_bin("rewind")
        .unwrap()
        .env("HOME", dir.path())
        .arg("-f")
        .arg(&json)
        .arg("--import")
        .arg("--db-path")
        .arg(&db)
        .assert()
        .success();
    assert_eq!(SessionStore::open(&db).unwrap().count().unwrap(), 4);
}
