use tracing::debug;

use crate::{
    clicks::{ClickBuffer, ClickMarker},
    cursor::{self, CursorPosition, Surface},
    event::ReplayEvent,
    scheduler::{FrameId, FrameScheduler},
    session::Session,
    timeline::find_event_index_at_time,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
    Completed,
}

/// Snapshot of the playback clock exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time_ms: f64,
    pub progress_percent: f64,
    pub current_event_index: Option<usize>,
}

/// Replays one session against a virtual clock.
///
/// All wall-clock input arrives as explicit `now_ms` arguments so the player
/// can be driven deterministically. The host calls [`Player::tick`] on every
/// display refresh; at most one frame is ever pending.
#[derive(Debug)]
pub struct Player {
    session: Session,
    total_duration_ms: f64,
    state: PlaybackState,
    clicks: ClickBuffer,
    last_click_timestamp: Option<u64>,
    scheduler: FrameScheduler,
    /// Wall-clock instant that maps to timeline zero
    anchor_ms: f64,
    surface: Option<Surface>,
    cursor: Option<CursorPosition>,
}

impl Player {
    pub fn new(session: Session) -> Self {
        let total_duration_ms = session.total_duration_ms();
        let current_event_index = if session.events.is_empty() {
            None
        } else {
            Some(0)
        };

        Self {
            session,
            total_duration_ms,
            state: PlaybackState {
                current_event_index,
                ..PlaybackState::default()
            },
            clicks: ClickBuffer::default(),
            last_click_timestamp: None,
            scheduler: FrameScheduler::new(),
            anchor_ms: 0.0,
            surface: None,
            cursor: None,
        }
    }

    pub fn with_click_buffer(mut self, clicks: ClickBuffer) -> Self {
        self.clicks = clicks;
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.set_surface(Some(surface));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn current_time_ms(&self) -> f64 {
        self.state.current_time_ms
    }

    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.total_duration_ms
    }

    pub fn current_event(&self) -> Option<&ReplayEvent> {
        self.state
            .current_event_index
            .and_then(|i| self.session.events.get(i))
    }

    pub fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    pub fn clicks(&self) -> &[ClickMarker] {
        self.clicks.markers()
    }

    pub fn has_events(&self) -> bool {
        !self.session.events.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.state.progress_percent >= 100.0
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.scheduler.pending()
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.state.is_playing {
            PlaybackStatus::Playing
        } else if self.is_completed() {
            PlaybackStatus::Completed
        } else if self.state.current_time_ms == 0.0 {
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Paused
        }
    }

    /// Record the measured render surface. `None` means nothing is mounted,
    /// in which case cursor updates are skipped until one is measured again.
    pub fn set_surface(&mut self, surface: Option<Surface>) {
        self.surface = surface;
        if let Some(event) = self.current_event().copied() {
            self.update_cursor(&event);
        }
    }

    pub fn play(&mut self, now_ms: f64) {
        if !self.has_events() || self.state.is_playing {
            return;
        }

        if self.is_completed() {
            self.state.current_time_ms = 0.0;
            self.state.progress_percent = 0.0;
            self.clicks.clear();
            self.last_click_timestamp = None;
            debug!(session = %self.session.id, "restarting playback from the beginning");
        }

        self.anchor_ms = now_ms - self.state.current_time_ms;
        self.state.is_playing = true;
        self.scheduler.schedule();
        debug!(
            session = %self.session.id,
            at_ms = self.state.current_time_ms,
            "playback started"
        );
    }

    pub fn pause(&mut self) {
        if self.state.is_playing {
            debug!(
                session = %self.session.id,
                at_ms = self.state.current_time_ms,
                "playback paused"
            );
        }
        self.state.is_playing = false;
        self.scheduler.cancel();
    }

    pub fn toggle(&mut self, now_ms: f64) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    /// Jump to `percent` of the timeline. Out-of-range targets are clamped.
    pub fn seek(&mut self, percent: f64, now_ms: f64) {
        if !self.has_events() {
            return;
        }

        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        let was_playing = self.state.is_playing;

        // the in-flight frame must not land after the new time is set
        self.scheduler.cancel();

        let new_time = percent / 100.0 * self.total_duration_ms;
        self.state.current_time_ms = new_time;
        self.state.progress_percent = percent;
        self.anchor_ms = now_ms - new_time;
        self.clicks.clear();
        self.last_click_timestamp = None;

        if let Some(index) = find_event_index_at_time(&self.session.events, new_time) {
            self.state.current_event_index = Some(index);
            let event = self.session.events[index];
            self.update_cursor(&event);
        }

        debug!(session = %self.session.id, percent, at_ms = new_time, "seek");

        if percent >= 100.0 {
            self.state.is_playing = false;
        } else if was_playing {
            self.scheduler.schedule();
        }
    }

    /// Relative seek in percentage points.
    pub fn seek_by(&mut self, delta_percent: f64, now_ms: f64) {
        let target = self.state.progress_percent + delta_percent;
        self.seek(target, now_ms);
    }

    /// Display refresh: runs the periodic click sweep and the pending frame.
    pub fn tick(&mut self, now_ms: f64) {
        self.clicks.maybe_sweep(now_ms);
        if let Some(frame) = self.scheduler.pending() {
            self.on_frame(frame, now_ms);
        }
    }

    /// Advance playback for one frame. Returns false when `frame` is stale.
    pub fn on_frame(&mut self, frame: FrameId, now_ms: f64) -> bool {
        if !self.scheduler.take(frame) || !self.state.is_playing {
            return false;
        }

        let elapsed = (now_ms - self.anchor_ms).max(0.0);
        self.state.current_time_ms = elapsed.min(self.total_duration_ms);
        self.state.progress_percent = self.progress_at(elapsed);

        if let Some(index) = find_event_index_at_time(&self.session.events, elapsed) {
            let event = self.session.events[index];
            self.state.current_event_index = Some(index);
            self.update_cursor(&event);

            if event.is_click() && self.last_click_timestamp != Some(event.timestamp) {
                self.last_click_timestamp = Some(event.timestamp);
                self.clicks.push(event.x, event.y);
            }
        }

        if elapsed >= self.total_duration_ms {
            self.state.is_playing = false;
            self.state.progress_percent = 100.0;
            debug!(session = %self.session.id, "playback completed");
        } else {
            self.scheduler.schedule();
        }

        true
    }

    fn progress_at(&self, time_ms: f64) -> f64 {
        if self.total_duration_ms <= 0.0 {
            return 100.0;
        }
        (time_ms / self.total_duration_ms * 100.0).min(100.0)
    }

    fn update_cursor(&mut self, event: &ReplayEvent) {
        if let Some(pos) = cursor::map_event(event, self.surface) {
            self.cursor = Some(pos);
        }
    }
}
