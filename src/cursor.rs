use crate::event::ReplayEvent;

/// Measured size of the surface the replay is drawn onto (pixels or cells)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

/// Map a percent-space point onto the surface.
pub fn to_surface(x_pct: f64, y_pct: f64, surface: Surface) -> CursorPosition {
    CursorPosition {
        x: x_pct * surface.width / 100.0,
        y: y_pct * surface.height / 100.0,
    }
}

/// Cursor position for an event, or `None` when no surface has been measured yet.
pub fn map_event(event: &ReplayEvent, surface: Option<Surface>) -> Option<CursorPosition> {
    surface.map(|s| to_surface(event.x, event.y, s))
}
