use ratatui::Frame;

use crate::{
    ui::{measure_surface, session_list::render_session_list},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Replay screen - measures the surface for this frame, then draws the App widget
pub struct ReplayScreen;

impl Screen for ReplayScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        let area = f.area();
        if let Some(player) = app.player.as_mut() {
            player.set_surface(measure_surface(area));
        }
        f.render_widget(&*app, area);
    }
}

/// Session list screen - uses dedicated renderer
pub struct SessionListScreen;

impl Screen for SessionListScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_session_list(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Replay => Box::new(ReplayScreen),
        AppState::SessionList => Box::new(SessionListScreen),
    }
}
