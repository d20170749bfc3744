//! Seeded generators for demo sessions.
//!
//! Every function takes the random source explicitly so fixtures are
//! reproducible: the same seed always yields the same sessions.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::{seq::SliceRandom, Rng};

use crate::{
    event::{EventKind, ReplayEvent},
    session::{Device, Session},
};

const BROWSERS: [&str; 4] = ["Chrome", "Firefox", "Safari", "Edge"];
const LANDING_PAGES: [&str; 5] = ["/", "/products", "/pricing", "/about", "/blog"];
const EXTRA_EXIT_PAGES: [&str; 3] = ["/checkout", "/contact", "/signup"];

/// Pointer trail roughly `duration_secs` long.
///
/// Each step waits 50-150ms and then clicks (5%), scrolls (5%, drifting
/// downward) or moves toward a jittered target in 1-3 interpolated hops.
pub fn generate_replay_events<R: Rng + ?Sized>(duration_secs: u64, rng: &mut R) -> Vec<ReplayEvent> {
    let mut events = Vec::new();
    let mut timestamp: u64 = 0;
    let mut x: f64 = rng.gen_range(5.0..95.0);
    let mut y: f64 = 10.0;

    events.push(ReplayEvent::new(EventKind::Move, x, y, timestamp));

    while timestamp < duration_secs * 1000 {
        timestamp += rng.gen_range(50..150);

        let roll: f64 = rng.gen();
        if roll > 0.95 {
            events.push(ReplayEvent::new(EventKind::Click, x, y, timestamp));
        } else if roll > 0.9 {
            events.push(ReplayEvent::new(EventKind::Scroll, x, y, timestamp));
            y = (y + rng.gen_range(-5.0..15.0)).clamp(5.0, 95.0);
        } else {
            let target_x = (x + rng.gen_range(-10.0..10.0)).clamp(0.0, 100.0);
            let target_y = (y + rng.gen_range(-5.0..5.0)).clamp(0.0, 100.0);

            let steps = rng.gen_range(1..=3);
            for i in 1..=steps {
                let f = i as f64 / steps as f64;
                timestamp += rng.gen_range(20..70);
                events.push(ReplayEvent::new(
                    EventKind::Move,
                    x + (target_x - x) * f,
                    y + (target_y - y) * f,
                    timestamp,
                ));
            }

            x = target_x;
            y = target_y;
        }
    }

    events
}

/// `count` sessions that started within the 24 hours before `now`.
pub fn generate_sessions<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<Session> {
    let exit_pages: Vec<&str> = LANDING_PAGES
        .iter()
        .chain(EXTRA_EXIT_PAGES.iter())
        .copied()
        .collect();

    (0..count)
        .map(|index| {
            let duration_secs = rng.gen_range(20..320);
            let device = *Device::ALL.choose(rng).unwrap_or(&Device::Desktop);
            let landing_page = LANDING_PAGES.choose(rng).unwrap_or(&"/").to_string();
            let exit_page = exit_pages.choose(rng).unwrap_or(&"/").to_string();

            let started = now
                - Duration::hours(rng.gen_range(0..24))
                - Duration::minutes(rng.gen_range(0..60));

            Session {
                id: format!("session-{}", index + 1),
                user_id: format!("user-{}", rng.gen_range(1..=1000)),
                device,
                browser: BROWSERS.choose(rng).unwrap_or(&"Chrome").to_string(),
                duration_secs,
                start_time: started.to_rfc3339_opts(SecondsFormat::Millis, true),
                events: generate_replay_events(duration_secs, rng),
                conversion_success: rng.gen::<f64>() > 0.7,
                landing_page,
                exit_page,
                content_snapshot: None,
            }
        })
        .collect()
}
