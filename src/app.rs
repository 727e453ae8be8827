use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::celebration::{self, Celebration};
use crate::config::{Config, ConfigStore};
use crate::controller::{Clock, SessionController, SystemClock, Transition};
use crate::highscores::{HighScoreEntry, HighScoreStore};
use crate::levels::Difficulty;
use crate::runtime::GameEvent;
use crate::session::{Phase, SessionState};

pub const MAX_NAME_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Leaderboard,
    NameEntry,
    Playing,
}

/// Audible feedback the terminal shell should play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    LevelPassed,
    GameWon,
}

pub struct App<S: HighScoreStore, C: Clock = SystemClock> {
    pub controller: SessionController<S, C>,
    pub screen: Screen,
    pub menu_selection: usize,
    pub difficulty: Difficulty,
    pub player_name: String,
    pub session: Option<SessionState>,
    pub high_scores: Vec<HighScoreEntry>,
    pub motivation: &'static str,
    pub celebration: Celebration,
    pub sound: bool,
    pub should_quit: bool,
    viewport: (u16, u16),
    pending_cue: Option<Cue>,
    config_store: Box<dyn ConfigStore>,
}

impl<S: HighScoreStore, C: Clock> App<S, C> {
    pub fn new(controller: SessionController<S, C>, config_store: Box<dyn ConfigStore>) -> Self {
        let config = config_store.load();
        let high_scores = controller.store().load_top_scores();

        Self {
            controller,
            screen: Screen::Menu,
            menu_selection: config.difficulty.index(),
            difficulty: config.difficulty,
            player_name: config.player_name.unwrap_or_default(),
            session: None,
            high_scores,
            motivation: celebration::MOTIVATIONS[0],
            celebration: Celebration::new(),
            sound: config.sound,
            should_quit: false,
            viewport: (80, 24),
            pending_cue: None,
            config_store,
        }
    }

    /// Record the drawable area so bursts are centred on screen
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    /// Sound cue raised since the last call, if sound is on
    pub fn take_cue(&mut self) -> Option<Cue> {
        self.pending_cue.take().filter(|_| self.sound)
    }

    pub fn handle_event(&mut self, ev: GameEvent) {
        match ev {
            GameEvent::Key(key) => self.handle_key(key),
            GameEvent::Click => self.handle_click(),
            GameEvent::Tick => self.celebration.update(),
            GameEvent::Resize => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Menu => self.on_menu_key(key),
            Screen::Leaderboard => {
                if key.code == KeyCode::Esc {
                    self.back_to_menu();
                }
            }
            Screen::NameEntry => self.on_name_key(key),
            Screen::Playing => self.on_playing_key(key),
        }
    }

    /// Mouse click: starts the timer or moves on from the results overlay
    pub fn handle_click(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        let Some(state) = self.session.as_mut() else {
            return;
        };
        let transition = match state.phase {
            Phase::Idle => self.controller.start(state),
            Phase::ResultsShown => self.controller.advance(state),
            Phase::Active { .. } | Phase::Won => Transition::Ignored,
        };
        self.on_transition(transition);
    }

    fn on_menu_key(&mut self, key: KeyEvent) {
        let count = Difficulty::ALL.len();
        match key.code {
            KeyCode::Up => self.menu_selection = (self.menu_selection + count - 1) % count,
            KeyCode::Down => self.menu_selection = (self.menu_selection + 1) % count,
            KeyCode::Enter => {
                self.difficulty = Difficulty::ALL[self.menu_selection % count];
                self.screen = Screen::NameEntry;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.high_scores = self.controller.store().load_top_scores();
                self.screen = Screen::Leaderboard;
            }
            KeyCode::Char(' ') => self.sound = !self.sound,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if !self.player_name.trim().is_empty() {
                    self.begin_session();
                }
            }
            KeyCode::Backspace => {
                self.player_name.pop();
            }
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Char(c) => {
                if self.player_name.chars().count() < MAX_NAME_LEN && !c.is_control() {
                    self.player_name.push(c);
                }
            }
            _ => {}
        }
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.back_to_menu();
            return;
        }
        let Some(state) = self.session.as_mut() else {
            return;
        };
        let transition = match (state.phase, key.code) {
            (Phase::Idle, KeyCode::Enter) => self.controller.start(state),
            (Phase::Active { .. }, KeyCode::Enter) => self.controller.submit(state),
            (Phase::Active { .. }, KeyCode::Backspace) => self.controller.backspace(state),
            (Phase::Active { .. }, KeyCode::Char(c)) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    Transition::Ignored
                } else {
                    self.controller.append_char(state, c)
                }
            }
            (Phase::ResultsShown, KeyCode::Enter) => self.controller.advance(state),
            _ => Transition::Ignored,
        };
        self.on_transition(transition);
    }

    fn on_transition(&mut self, transition: Transition) {
        let (width, height) = self.viewport;
        match transition {
            Transition::Passed(_) => {
                self.motivation = celebration::random_motivation();
                self.celebration.burst(width, height);
                self.pending_cue = Some(Cue::LevelPassed);
            }
            Transition::NextLevel(_) => self.celebration.clear(),
            Transition::Won { .. } => {
                self.celebration.burst(width, height);
                self.pending_cue = Some(Cue::GameWon);
                self.high_scores = self.controller.store().load_top_scores();
            }
            Transition::Ignored
            | Transition::Started
            | Transition::Edited
            | Transition::Failed(_) => {}
        }
    }

    /// Start a play-through for the current name and difficulty
    pub fn begin_session(&mut self) {
        let state = self
            .controller
            .new_session(&self.player_name, self.difficulty);
        self.player_name = state.player_name.clone();
        self.session = Some(state);
        self.celebration.clear();
        self.screen = Screen::Playing;

        let config = Config {
            difficulty: self.difficulty,
            player_name: Some(self.player_name.clone()),
            sound: self.sound,
        };
        if let Err(e) = self.config_store.save(&config) {
            warn!(error = %e, "could not save config");
        }
    }

    fn back_to_menu(&mut self) {
        if let Some(state) = self.session.take() {
            self.controller.reset_to_menu(state);
        }
        self.celebration.clear();
        self.screen = Screen::Menu;
        self.menu_selection = Difficulty::Medium.index();
    }
}
