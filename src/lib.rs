// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clicks;
pub mod config;
pub mod cursor;
pub mod event;
pub mod mock;
pub mod player;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod store;
pub mod timeline;
pub mod util;

pub use event::{EventKind, ReplayEvent};
pub use player::{PlaybackState, PlaybackStatus, Player};
pub use session::{Device, Session};
