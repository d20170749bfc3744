use itertools::Itertools;

use crate::{
    session::{Device, Session},
    util::mean,
};

/// Aggregate numbers shown above the session list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub average_duration_secs: f64,
    pub total_clicks: usize,
    pub conversion_rate: f64,
    pub desktop: usize,
    pub mobile: usize,
    pub tablet: usize,
}

impl SessionStats {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }

        let durations: Vec<f64> = sessions.iter().map(|s| s.duration_secs as f64).collect();
        let conversions = sessions.iter().filter(|s| s.conversion_success).count();
        let devices = sessions.iter().map(|s| s.device).counts();
        let device_count = |d: Device| devices.get(&d).copied().unwrap_or(0);

        Self {
            total_sessions: sessions.len(),
            average_duration_secs: mean(&durations).unwrap_or(0.0),
            total_clicks: sessions.iter().map(Session::click_count).sum(),
            conversion_rate: conversions as f64 / sessions.len() as f64,
            desktop: device_count(Device::Desktop),
            mobile: device_count(Device::Mobile),
            tablet: device_count(Device::Tablet),
        }
    }

    pub fn device_share(&self, device: Device) -> f64 {
        if self.total_sessions == 0 {
            return 0.0;
        }
        let n = match device {
            Device::Desktop => self.desktop,
            Device::Mobile => self.mobile,
            Device::Tablet => self.tablet,
        };
        n as f64 / self.total_sessions as f64
    }

    /// One-line summary, e.g. `25 sessions | avg 02:41 | 113 clicks | 28% converted`
    pub fn summary_line(&self) -> String {
        format!(
            "{} sessions | avg {} | {} clicks | {:.0}% converted",
            self.total_sessions,
            crate::util::format_clock(self.average_duration_secs.round() * 1000.0),
            self.total_clicks,
            self.conversion_rate * 100.0
        )
    }
}
