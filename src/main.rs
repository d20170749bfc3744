pub mod ui;

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use rewind::{
    app_dirs::AppDirs,
    clicks::ClickBuffer,
    config::{Config, ConfigStore, FileConfigStore},
    cursor::Surface,
    mock::generate_sessions,
    player::Player,
    runtime::{AppEvent, Clock, CrosstermEventSource, FixedTicker, MonotonicClock, Runner},
    session::Session,
    stats::SessionStats,
    store::{load_sessions_json, save_sessions_json, SessionError, SessionStore},
    util::{format_clock, format_start_date, truncate_width},
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// replay recorded web analytics sessions in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Replay recorded web analytics sessions in the terminal: play, pause and scrub through pointer trails, clicks and scrolls, and browse per-session metadata."
)]
pub struct Cli {
    /// number of mock sessions to generate when no other source is given
    #[clap(short = 'n', long)]
    sessions: Option<usize>,

    /// seed for the mock session generator (random when omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// load sessions from a JSON file
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// load sessions from the session database
    #[clap(long)]
    db: bool,

    /// session database location (defaults to the state directory)
    #[clap(long)]
    db_path: Option<PathBuf>,

    /// store the loaded sessions in the session database
    #[clap(long)]
    import: bool,

    /// write the loaded sessions to a JSON file and exit
    #[clap(long)]
    export: Option<PathBuf>,

    /// print the session table and summary, then exit
    #[clap(long)]
    list: bool,

    /// id of the session to open first
    #[clap(short = 's', long)]
    session: Option<String>,

    /// print the playback state at this percentage of the selected session and exit
    #[clap(long)]
    at: Option<f64>,

    /// render surface width in pixels for --at
    #[clap(long)]
    width: Option<u32>,

    /// render surface height in pixels for --at
    #[clap(long)]
    height: Option<u32>,

    /// display refresh interval in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,
}

impl Cli {
    /// Command line flags take precedence over the stored config
    fn apply_to(&self, config: &mut Config) {
        if let Some(n) = self.sessions {
            config.mock_sessions = n;
        }
        if let Some(w) = self.width {
            config.surface_width = w;
        }
        if let Some(h) = self.height {
            config.surface_height = h;
        }
        if let Some(t) = self.tick_ms {
            config.tick_rate_ms = t.max(1);
        }
    }

    fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(AppDirs::db_path)
            .unwrap_or_else(|| PathBuf::from("rewind_sessions.db"))
    }

    fn headless(&self) -> bool {
        self.list || self.export.is_some() || self.at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Replay,
    SessionList,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub sessions: Vec<Session>,
    pub selected: usize,
    pub player: Option<Player>,
    pub state: AppState,
    pub list_cursor: usize,
    pub list_offset: usize,
    pub stats: SessionStats,
    pub config: Config,
}

impl App {
    pub fn new(sessions: Vec<Session>, config: Config) -> Self {
        let stats = SessionStats::from_sessions(&sessions);
        let mut app = Self {
            sessions,
            selected: 0,
            player: None,
            state: AppState::Replay,
            list_cursor: 0,
            list_offset: 0,
            stats,
            config,
        };
        app.select(0);
        app
    }

    /// Tear down the current player and start fresh on `index`
    pub fn select(&mut self, index: usize) {
        if let Some(player) = self.player.as_mut() {
            player.pause();
        }
        self.player = self.sessions.get(index).map(|session| {
            Player::new(session.clone()).with_click_buffer(ClickBuffer::new(
                self.config.click_capacity,
                self.config.click_sweep_interval_ms,
            ))
        });
        if self.player.is_some() {
            self.selected = index;
            self.list_cursor = index;
        }
    }

    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.sessions.iter().position(|s| s.id == id) {
            Some(index) => {
                self.select(index);
                true
            }
            None => false,
        }
    }

    pub fn prev_session(&mut self) {
        if self.selected > 0 {
            self.select(self.selected - 1);
        }
    }

    pub fn next_session(&mut self) {
        if self.selected + 1 < self.sessions.len() {
            self.select(self.selected + 1);
        }
    }

    pub fn on_tick(&mut self, now_ms: f64) {
        if let Some(player) = self.player.as_mut() {
            player.tick(now_ms);
        }
    }

    /// True while something on screen changes without input
    pub fn is_animating(&self) -> bool {
        self.player.as_ref().is_some_and(Player::is_playing)
    }

    fn handle_key(&mut self, key: KeyEvent, now_ms: f64) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::Replay => self.handle_replay_key(key, now_ms),
            AppState::SessionList => self.handle_list_key(key),
        }
    }

    fn handle_replay_key(&mut self, key: KeyEvent, now_ms: f64) -> KeyOutcome {
        let step = self.config.seek_step_percent;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('l') => self.state = AppState::SessionList,
            KeyCode::Char('[') | KeyCode::Char('p') => self.prev_session(),
            KeyCode::Char(']') | KeyCode::Char('n') => self.next_session(),
            code => {
                if let Some(player) = self.player.as_mut() {
                    match code {
                        KeyCode::Char(' ') => player.toggle(now_ms),
                        KeyCode::Left => player.seek_by(-step, now_ms),
                        KeyCode::Right => player.seek_by(step, now_ms),
                        KeyCode::Home => player.seek(0.0, now_ms),
                        KeyCode::End => player.seek(100.0, now_ms),
                        KeyCode::Char(c) if c.is_ascii_digit() => {
                            let tenth = c.to_digit(10).unwrap_or(0) as f64;
                            player.seek(tenth * 10.0, now_ms);
                        }
                        _ => {}
                    }
                }
            }
        }
        KeyOutcome::Continue
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let last = self.sessions.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Esc | KeyCode::Char('l') | KeyCode::Backspace => {
                self.list_cursor = self.selected;
                self.state = AppState::Replay;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_cursor = (self.list_cursor + 1).min(last);
            }
            KeyCode::PageUp => {
                self.list_cursor = self.list_cursor.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.list_cursor = (self.list_cursor + 10).min(last);
            }
            KeyCode::Home => self.list_cursor = 0,
            KeyCode::End => self.list_cursor = last,
            KeyCode::Enter => {
                self.select(self.list_cursor);
                self.state = AppState::Replay;
            }
            _ => {}
        }
        KeyOutcome::Continue
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let mut config = FileConfigStore::new().load();
    cli.apply_to(&mut config);

    let sessions = load_sessions(&cli, &config)?;
    info!(count = sessions.len(), "sessions loaded");

    if cli.import {
        let mut store = SessionStore::open(cli.db_path())?;
        store.save_all(&sessions)?;
        println!("imported {} sessions into {}", sessions.len(), cli.db_path().display());
    }

    if let Some(path) = &cli.export {
        save_sessions_json(path, &sessions)?;
        println!("wrote {} sessions to {}", sessions.len(), path.display());
    }

    let mut app = App::new(sessions, config);
    if let Some(id) = &cli.session {
        if !app.select_by_id(id) {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("no session with id {id}"))
                .exit();
        }
    }

    if cli.list {
        print!("{}", session_table(&app.sessions, &app.stats));
    }

    if let Some(percent) = cli.at {
        let surface = Surface::new(
            app.config.surface_width as f64,
            app.config.surface_height as f64,
        );
        match app.player.as_mut() {
            Some(player) => {
                player.set_surface(Some(surface));
                player.seek(percent, 0.0);
                println!("{}", describe_playback(player));
            }
            None => println!("no sessions"),
        }
    }

    if cli.headless() || cli.import {
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

/// Logs go to a file: the terminal is owned by the UI while running.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rewind=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn load_sessions(cli: &Cli, config: &Config) -> Result<Vec<Session>, SessionError> {
    if let Some(path) = &cli.file {
        return load_sessions_json(path);
    }
    if cli.db {
        let sessions = SessionStore::open(cli.db_path())?.list()?;
        if sessions.is_empty() {
            warn!(path = %cli.db_path().display(), "session database is empty");
        }
        return Ok(sessions);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(generate_sessions(config.mock_sessions, &mut rng, Utc::now()))
}

fn session_table(sessions: &[Session], stats: &SessionStats) -> String {
    let mut out = format!(
        "{:<14} {:<10} {:<8} {:<8} {:>6} {:>6} {:>4} {}\n",
        "SESSION", "USER", "DEVICE", "BROWSER", "LENGTH", "CLICKS", "CONV", "DATE"
    );
    for s in sessions {
        out.push_str(&format!(
            "{:<14} {:<10} {:<8} {:<8} {:>6} {:>6} {:>4} {}\n",
            truncate_width(&s.id, 14),
            truncate_width(&s.user_id, 10),
            s.device,
            truncate_width(&s.browser, 8),
            format_clock(s.duration_secs as f64 * 1000.0),
            s.click_count(),
            if s.conversion_success { "yes" } else { "no" },
            format_start_date(&s.start_time),
        ));
    }
    out.push_str(&stats.summary_line());
    out.push('\n');
    out
}

fn describe_playback(player: &Player) -> String {
    let session = player.session();
    let event = match player.current_event() {
        Some(e) => format!("{} at ({:.0}, {:.0})", e.kind, e.x, e.y),
        None => "none".to_string(),
    };
    let cursor = match player.cursor() {
        Some(c) => format!("({:.1}, {:.1})", c.x, c.y),
        None => "-".to_string(),
    };
    format!(
        "{} {} / {} ({:.1}%) event: {} cursor: {}",
        session.id,
        format_clock(player.current_time_ms()),
        format_clock(player.total_duration_ms()),
        player.progress_percent(),
        event,
        cursor
    )
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let clock = MonotonicClock::new();
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(app.config.tick_rate_ms)),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                let animating = app.is_animating();
                app.on_tick(clock.now_ms());
                if animating {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if app.handle_key(key, clock.now_ms()) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    let screen = crate::ui::screen::current_screen(&app.state);
    screen.render(app, f);
}
