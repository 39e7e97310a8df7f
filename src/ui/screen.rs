use flick::session::Phase;
use ratatui::Frame;

use crate::{
    ui::{render_play, render_results, render_start},
    App,
};

/// A UI Screen boundary: responsible for rendering one session phase
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Title, difficulty selector and start hint
pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_start(app, f);
    }
}

/// HUD plus the arena with live targets
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_play(app, f);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_results(app, f);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(StartScreen),
        Phase::Active => Box::new(PlayScreen),
        Phase::GameOver => Box::new(ResultsScreen),
    }
}
