pub mod ui;

use crate::ui::{summary_rows, ui};
use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flick::{
    app_dirs::AppDirs,
    audio::{AudioSettings, AudioSink, BellSink, CuePlayer},
    config::{FilePreferenceStore, PreferenceStore},
    export,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{Difficulty, Phase, Session, SessionConfig, SessionEvent},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthStr;

const TICK_RATE_MS: u64 = 100;
const MAX_SECS: u64 = 3600;

/// terminal reaction-time aim trainer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Click targets with the mouse before they vanish. Each session reports reaction time, accuracy, consistency and a performance tier, and can be exported as CSV or JSON."
)]
pub struct Cli {
    /// how many targets are on screen at once (easy 1, medium 2, hard 3)
    #[clap(short = 'd', long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// number of seconds per session (1 to 3600)
    #[clap(short = 's', long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=MAX_SECS))]
    secs: u64,

    /// start with sound muted (remembered for next time)
    #[clap(long)]
    mute: bool,

    /// directory for csv/json session exports
    #[clap(long)]
    export_dir: Option<PathBuf>,

    /// print the summary of an exported json session and exit
    #[clap(long, value_name = "FILE")]
    summarize: Option<PathBuf>,
}

impl Cli {
    fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_ms: self.secs.saturating_mul(1000),
            difficulty: self.difficulty,
            ..SessionConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub cli: Cli,
    pub session: Session<StdRng>,
    pub audio: CuePlayer<Box<dyn AudioSink>>,
    pub prefs: Box<dyn PreferenceStore>,
    pub export_dir: PathBuf,
    /// One-line message shown under the current screen.
    pub status: Option<String>,
    /// Where the arena was last drawn; mouse clicks map through it.
    pub arena_area: Rect,
}

impl App {
    pub fn new(cli: Cli, mut prefs: Box<dyn PreferenceStore>, sink: Box<dyn AudioSink>) -> Self {
        let mut settings = AudioSettings::load(prefs.as_ref());
        if cli.mute {
            if let Err(e) = settings.set_muted(true, prefs.as_mut()) {
                log::warn!("could not save mute preference: {e}");
            }
        }

        Self {
            session: Session::new(cli.to_session_config(), StdRng::from_entropy()),
            audio: CuePlayer::new(settings, sink),
            prefs,
            export_dir: cli.export_dir.clone().unwrap_or_else(AppDirs::export_dir),
            status: None,
            arena_area: Rect::default(),
            cli,
        }
    }

    fn apply(&mut self, events: &[SessionEvent]) {
        self.audio.handle(events);
        for event in events {
            if let SessionEvent::GameOver { hits, missed } = event {
                self.status = Some(format!("{hits} hit, {missed} missed"));
            }
        }
    }

    pub fn start(&mut self) {
        self.status = None;
        let events = self.session.start();
        self.apply(&events);
    }

    pub fn on_tick(&mut self, elapsed_ms: u64) {
        let events = self.session.tick(elapsed_ms);
        self.apply(&events);
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let arena = self.session.config().arena;
        if let Some(point) = arena.cell_to_point(self.arena_area, mouse.column, mouse.row) {
            if let Some(event) = self.session.click(point) {
                self.apply(&[event]);
            }
        }
    }

    pub fn toggle_mute(&mut self) {
        match self.audio.settings.toggle_mute(self.prefs.as_mut()) {
            Ok(true) => self.status = Some("Sound muted".to_string()),
            Ok(false) => self.status = Some("Sound on".to_string()),
            Err(e) => {
                log::warn!("could not save mute preference: {e}");
                self.status = Some(format!("Mute not saved: {e}"));
            }
        }
    }

    pub fn export(&mut self) {
        let result = export::write_session(
            &self.export_dir,
            Local::now(),
            self.session.summary(),
            self.session.events(),
        );
        self.status = Some(match result {
            Ok(paths) => format!(
                "Saved {} and {}",
                paths.csv.display(),
                paths.json.display()
            ),
            Err(e) => {
                log::warn!("export to {} failed: {e}", self.export_dir.display());
                format!("Export failed: {e}")
            }
        });
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match (self.session.phase(), key.code) {
            (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => return Flow::Quit,
            (_, KeyCode::Char('m')) => self.toggle_mute(),
            (Phase::Idle, KeyCode::Char(' ')) | (Phase::Idle, KeyCode::Enter) => self.start(),
            (Phase::Idle, KeyCode::Char('1')) => self.session.set_difficulty(Difficulty::Easy),
            (Phase::Idle, KeyCode::Char('2')) => self.session.set_difficulty(Difficulty::Medium),
            (Phase::Idle, KeyCode::Char('3')) => self.session.set_difficulty(Difficulty::Hard),
            (Phase::GameOver, KeyCode::Char('r')) => {
                self.status = None;
                let events = self.session.restart();
                self.apply(&events);
            }
            (Phase::GameOver, KeyCode::Char('h')) => {
                self.status = None;
                self.session.reset();
            }
            (Phase::GameOver, KeyCode::Char('e')) => self.export(),
            _ => {}
        }
        Flow::Continue
    }
}

/// Wall-clock source for session ticks; hands out whole milliseconds and
/// carries the remainder into the next lap.
struct Stopwatch {
    last: Instant,
}

impl Stopwatch {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn lap(&mut self) -> u64 {
        let ms = self.last.elapsed().as_millis() as u64;
        self.last += Duration::from_millis(ms);
        ms
    }
}

fn print_summary(path: &Path) -> Result<(), Box<dyn Error>> {
    let report = export::read_report(path)?;

    let Some(summary) = report.summary else {
        println!("No targets were hit.");
        return Ok(());
    };

    println!("{}", summary.performance_tier.label());
    let rows = summary_rows(&summary, None);
    let label_width = rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("{label}{} {value}", " ".repeat(label_width - label.width()));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().filter_or("FLICK_LOG", "warn"))
        .try_init();

    if let Some(path) = &cli.summarize {
        return print_summary(path);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        cli,
        Box::new(FilePreferenceStore::new()),
        Box::new(BellSink::new(io::stdout())),
    );
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut stopwatch = Stopwatch::new();

    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step();
        // Advance before handling input so clicks are stamped with the current time.
        app.on_tick(stopwatch.lap());

        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Mouse(mouse) => app.on_mouse(mouse),
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
