use serde::{Deserialize, Serialize};

use crate::event::ReplayEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
    Tablet,
}

impl Device {
    pub const ALL: [Device; 3] = [Device::Desktop, Device::Mobile, Device::Tablet];
}

/// One recorded visit. Immutable once loaded; players only borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub device: Device,
    pub browser: String,
    /// Declared duration in seconds
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    /// ISO-8601 start of the visit
    #[serde(default)]
    pub start_time: String,
    pub events: Vec<ReplayEvent>,
    pub conversion_success: bool,
    #[serde(default)]
    pub landing_page: String,
    #[serde(default)]
    pub exit_page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_snapshot: Option<String>,
}

impl Session {
    /// Timeline length in ms: the last event's timestamp, or the declared
    /// duration when there are no events.
    pub fn total_duration_ms(&self) -> f64 {
        match self.events.last() {
            Some(last) => last.timestamp as f64,
            None => (self.duration_secs * 1000) as f64,
        }
    }

    pub fn click_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_click()).count()
    }
}
