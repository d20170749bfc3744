use serde::{Deserialize, Serialize};

/// Kind of recorded pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    Move,
    Click,
    Scroll,
}

/// A single recorded interaction. `x`/`y` are percentages of the page
/// viewport, `timestamp` is milliseconds since session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub x: f64,
    pub y: f64,
    pub timestamp: u64,
}

impl ReplayEvent {
    pub fn new(kind: EventKind, x: f64, y: f64, timestamp: u64) -> Self {
        Self {
            kind,
            x,
            y,
            timestamp,
        }
    }

    pub fn is_click(&self) -> bool {
        self.kind == EventKind::Click
    }
}

/// True when timestamps never decrease. Playback assumes this but never reorders.
pub fn is_sorted(events: &[ReplayEvent]) -> bool {
    events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
