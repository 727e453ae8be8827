//! The game's state machine.
//!
//! [`SessionController`] owns no session data. Every intent takes the
//! [`SessionState`] by reference, checks the current [`Phase`], and either
//! applies the transition or reports [`Transition::Ignored`]. Stray intents
//! (a submit while idle, an advance mid-level) are expected from the input
//! layer and are never errors.

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::highscores::{HighScoreEntry, HighScoreStore};
use crate::levels::Difficulty;
use crate::scoring;
use crate::session::{LevelResult, Phase, SessionState};

/// Source of "now" for the level timer
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// What an intent did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Not allowed in the current phase; nothing changed
    Ignored,
    /// Timer started
    Started,
    /// Typed text changed
    Edited,
    /// Submit met the accuracy goal; waiting for advance
    Passed(LevelResult),
    /// Submit missed the goal; input cleared for a retry
    Failed(LevelResult),
    /// Moved on to the given level
    NextLevel(u8),
    /// Final level cleared. `saved` is false if the high score write failed.
    Won { saved: bool },
}

pub struct SessionController<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: HighScoreStore> SessionController<S, SystemClock> {
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: HighScoreStore, C: Clock> SessionController<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn new_session(&self, player_name: &str, difficulty: Difficulty) -> SessionState {
        let state = SessionState::new(player_name.trim(), difficulty);
        info!(player = %state.player_name, %difficulty, "session started");
        state
    }

    pub fn start(&self, state: &mut SessionState) -> Transition {
        if state.phase != Phase::Idle {
            return ignored("start", state);
        }
        state.phase = Phase::Active {
            started_at: self.clock.now(),
        };
        debug!(level = state.current_level, "timer started");
        Transition::Started
    }

    pub fn append_char(&self, state: &mut SessionState, c: char) -> Transition {
        if !state.phase.is_active() {
            return ignored("append_char", state);
        }
        state.typed_text.push(c);
        Transition::Edited
    }

    pub fn backspace(&self, state: &mut SessionState) -> Transition {
        if !state.phase.is_active() {
            return ignored("backspace", state);
        }
        state.typed_text.pop();
        Transition::Edited
    }

    pub fn submit(&self, state: &mut SessionState) -> Transition {
        let Phase::Active { started_at } = state.phase else {
            return ignored("submit", state);
        };

        let elapsed_secs = self
            .clock
            .now()
            .saturating_duration_since(started_at)
            .as_secs_f64();
        let accuracy = scoring::accuracy_percent(state.sentence(), &state.typed_text);
        let wpm = scoring::words_per_minute(state.typed_text.chars().count(), elapsed_secs);
        let score = scoring::score_level(
            accuracy,
            state.effective_time_limit,
            elapsed_secs,
            state.difficulty.profile().score_multiplier,
            state.current_level,
        );
        let passed = accuracy >= state.effective_required_accuracy;

        // points accrue whether or not the goal was met
        state.total_score += score.level_score;
        state.attempts += 1;

        let result = LevelResult {
            accuracy,
            wpm,
            elapsed_secs,
            score,
            passed,
        };
        state.last_result = Some(result);

        info!(
            level = state.current_level,
            accuracy,
            wpm,
            elapsed_secs,
            points = score.level_score,
            passed,
            "level submitted"
        );

        if passed {
            state.stars_earned += 1;
            state.phase = Phase::ResultsShown;
            Transition::Passed(result)
        } else {
            state.typed_text.clear();
            state.phase = Phase::Idle;
            Transition::Failed(result)
        }
    }

    pub fn advance(&self, state: &mut SessionState) -> Transition {
        if state.phase != Phase::ResultsShown {
            return ignored("advance", state);
        }

        if state.is_final_level() {
            state.phase = Phase::Won;
            info!(
                player = %state.player_name,
                score = state.total_score,
                stars = state.stars_earned,
                "game won"
            );
            let saved = match self.store.submit_score(HighScoreEntry::from_session(state)) {
                Ok(_) => true,
                Err(e) => {
                    warn!(error = %e, "could not save high score");
                    false
                }
            };
            return Transition::Won { saved };
        }

        state.enter_level(state.current_level + 1);
        info!(level = state.current_level, "level started");
        Transition::NextLevel(state.current_level)
    }

    /// Abandon the session and hand control back to the menu
    pub fn reset_to_menu(&self, state: SessionState) {
        info!(
            player = %state.player_name,
            level = state.current_level,
            score = state.total_score,
            "session closed"
        );
    }
}

fn ignored(intent: &'static str, state: &SessionState) -> Transition {
    debug!(intent, phase = ?state.phase, "ignoring intent");
    Transition::Ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::highscores::InMemoryHighScoreStore;
    use crate::levels::MAX_LEVEL;
    use assert_matches::assert_matches;

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load_top_scores(&self) -> Vec<HighScoreEntry> {
            Vec::new()
        }

        fn submit_score(
            &self,
            _entry: HighScoreEntry,
        ) -> Result<Vec<HighScoreEntry>, PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk on fire")))
        }
    }

    fn controller() -> SessionController<InMemoryHighScoreStore, ManualClock> {
        SessionController::new(InMemoryHighScoreStore::new(), ManualClock::new())
    }

    fn type_str<S: HighScoreStore, C: Clock>(
        ctl: &SessionController<S, C>,
        state: &mut SessionState,
        text: &str,
    ) {
        for c in text.chars() {
            ctl.append_char(state, c);
        }
    }

    /// Type the current sentence perfectly and submit after `secs`
    fn clear_level<S: HighScoreStore>(
        ctl: &SessionController<S, ManualClock>,
        state: &mut SessionState,
        secs: f64,
    ) -> Transition {
        ctl.start(state);
        let sentence = state.sentence();
        type_str(ctl, state, sentence);
        ctl.clock.advance_secs(secs);
        ctl.submit(state)
    }

    #[test]
    fn test_new_session_trims_name() {
        let ctl = controller();
        let state = ctl.new_session("  ana  ", Difficulty::Easy);
        assert_eq!(state.player_name, "ana");
        assert_eq!(state.difficulty, Difficulty::Easy);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_start_only_from_idle() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);

        assert_eq!(ctl.start(&mut state), Transition::Started);
        let started = state.phase;
        assert_matches!(started, Phase::Active { .. });

        ctl.clock.advance_secs(3.0);
        assert_eq!(ctl.start(&mut state), Transition::Ignored);
        assert_eq!(state.phase, started, "restart must not reset the timer");
    }

    #[test]
    fn test_typing_ignored_until_started() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);

        assert_eq!(ctl.append_char(&mut state, 'H'), Transition::Ignored);
        assert_eq!(ctl.backspace(&mut state), Transition::Ignored);
        assert!(state.typed_text.is_empty());

        ctl.start(&mut state);
        assert_eq!(ctl.append_char(&mut state, 'H'), Transition::Edited);
        assert_eq!(state.typed_text, "H");
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);

        type_str(&ctl, &mut state, "Hé");
        ctl.backspace(&mut state);
        assert_eq!(state.typed_text, "H");
        ctl.backspace(&mut state);
        assert_eq!(state.typed_text, "");
        assert_eq!(ctl.backspace(&mut state), Transition::Edited);
        assert_eq!(state.typed_text, "");
    }

    #[test]
    fn test_overtyping_is_allowed() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);

        let long = format!("{} and then some", state.sentence());
        type_str(&ctl, &mut state, &long);
        assert_eq!(state.typed_text, long);
        assert_eq!(state.live_accuracy(), 100.0);
    }

    #[test]
    fn test_submit_is_noop_unless_active() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);

        assert_eq!(ctl.submit(&mut state), Transition::Ignored);
        assert_eq!(state.total_score, 0);
        assert!(state.last_result.is_none());

        clear_level(&ctl, &mut state, 10.0);
        assert_eq!(state.phase, Phase::ResultsShown);
        let score = state.total_score;
        assert_eq!(ctl.submit(&mut state), Transition::Ignored);
        assert_eq!(state.total_score, score);
        assert_eq!(state.stars_earned, 1);
    }

    #[test]
    fn test_successful_submit_scores_and_awards_star() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);

        let transition = clear_level(&ctl, &mut state, 30.0);

        let result = assert_matches!(transition, Transition::Passed(r) => r);
        assert_eq!(result.accuracy, 100.0);
        assert!(result.passed);
        assert_eq!(result.elapsed_secs, 30.0);
        // 30 chars in 30s = 6 words / 0.5 min
        assert_eq!(result.wpm, 12.0);
        assert_eq!(result.score.base_score, 1000);
        assert_eq!(result.score.time_bonus, (999 - 30) * 5);
        // (1000 + 4845) * 1.5 * 0.5 = 4383.75
        assert_eq!(result.score.level_score, 4383);

        assert_eq!(state.total_score, 4383);
        assert_eq!(state.stars_earned, 1);
        assert_eq!(state.phase, Phase::ResultsShown);
        assert_eq!(state.last_result, Some(result));
    }

    #[test]
    fn test_failed_submit_clears_input_and_still_scores() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);
        type_str(&ctl, &mut state, "Hello");
        ctl.clock.advance_secs(10.0);

        let result = assert_matches!(ctl.submit(&mut state), Transition::Failed(r) => r);

        assert!(!result.passed);
        assert!(result.accuracy < state.effective_required_accuracy);
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.typed_text.is_empty());
        assert_eq!(state.current_level, 1);
        assert_eq!(state.stars_earned, 0);
        assert_eq!(state.total_score, result.score.level_score);
        assert!(state.total_score > 0);
        assert_eq!(state.attempts, 1);
    }

    #[test]
    fn test_retry_after_failure_needs_new_start() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);
        ctl.submit(&mut state);
        assert_eq!(state.phase, Phase::Idle);

        assert_eq!(ctl.append_char(&mut state, 'H'), Transition::Ignored);
        assert_eq!(ctl.start(&mut state), Transition::Started);
        assert_eq!(ctl.append_char(&mut state, 'H'), Transition::Edited);
    }

    #[test]
    fn test_submit_exactly_at_required_accuracy_passes() {
        let ctl = controller();
        // level 1 on Medium needs 70%: 21 of 30 chars
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);
        let partial: String = state.sentence().chars().take(21).collect();
        type_str(&ctl, &mut state, &partial);
        ctl.clock.advance_secs(5.0);

        let result = assert_matches!(ctl.submit(&mut state), Transition::Passed(r) => r);
        assert_eq!(result.accuracy, 70.0);
    }

    #[test]
    fn test_late_submit_is_penalised_not_rejected() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        state.enter_level(10);

        let result = assert_matches!(clear_level(&ctl, &mut state, 40.0), Transition::Passed(r) => r);
        assert_eq!(result.score.time_bonus, -100);
        // (1000 - 100) * 1.5 * 5.0
        assert_eq!(result.score.level_score, 6750);
    }

    #[test]
    fn test_zero_elapsed_submit_has_zero_wpm() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);
        type_str(&ctl, &mut state, "Hello");

        let result = match ctl.submit(&mut state) {
            Transition::Passed(r) | Transition::Failed(r) => r,
            other => panic!("unexpected transition {other:?}"),
        };
        assert_eq!(result.wpm, 0.0);
        assert_eq!(result.elapsed_secs, 0.0);
    }

    #[test]
    fn test_advance_is_noop_while_idle_or_active() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);

        for _ in 0..5 {
            assert_eq!(ctl.advance(&mut state), Transition::Ignored);
        }
        assert_eq!(state.current_level, 1);

        ctl.start(&mut state);
        assert_eq!(ctl.advance(&mut state), Transition::Ignored);
        assert_eq!(state.current_level, 1);
    }

    #[test]
    fn test_advance_loads_next_level() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Easy);
        clear_level(&ctl, &mut state, 12.0);

        assert_eq!(ctl.advance(&mut state), Transition::NextLevel(2));
        assert_eq!(state.current_level, 2);
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.typed_text.is_empty());
        assert_eq!(state.sentence(), "The quick brown fox jumps");
        assert_eq!(state.effective_time_limit, 90.0);
        assert_eq!(state.effective_required_accuracy, 60.0);
        assert_eq!(state.attempts, 0);
        // the last result survives until the next submit
        assert!(state.last_result.is_some());
    }

    #[test]
    fn test_full_game_wins_once_and_saves_once() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);

        for level in 1..=MAX_LEVEL {
            assert_eq!(state.current_level, level);
            assert_matches!(clear_level(&ctl, &mut state, 5.0), Transition::Passed(_));
            let transition = ctl.advance(&mut state);
            if level < MAX_LEVEL {
                assert_eq!(transition, Transition::NextLevel(level + 1));
            } else {
                assert_eq!(transition, Transition::Won { saved: true });
            }
        }

        assert_eq!(state.phase, Phase::Won);
        assert_eq!(state.current_level, MAX_LEVEL);
        assert_eq!(state.stars_earned, 10);
        assert_eq!(ctl.store().submissions(), 1);

        // terminal: further intents do nothing and never save again
        assert_eq!(ctl.advance(&mut state), Transition::Ignored);
        assert_eq!(ctl.start(&mut state), Transition::Ignored);
        assert_eq!(ctl.submit(&mut state), Transition::Ignored);
        assert_eq!(ctl.store().submissions(), 1);

        let board = ctl.store().load_top_scores();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "ana");
        assert_eq!(board[0].score, state.total_score);
        assert_eq!(board[0].stars, 10);
        assert_eq!(board[0].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_win_survives_store_failure() {
        let ctl = SessionController::new(BrokenStore, ManualClock::new());
        let mut state = ctl.new_session("ana", Difficulty::Easy);
        state.enter_level(MAX_LEVEL);

        clear_level(&ctl, &mut state, 5.0);
        assert_eq!(ctl.advance(&mut state), Transition::Won { saved: false });
        assert_eq!(state.phase, Phase::Won);
    }

    #[test]
    fn test_effective_goals_hold_for_every_level_and_difficulty() {
        let ctl = controller();
        for difficulty in Difficulty::ALL {
            let mut state = ctl.new_session("ana", difficulty);
            let profile = difficulty.profile();
            loop {
                let level = crate::levels::get_level(state.current_level).unwrap();
                assert_eq!(
                    state.effective_required_accuracy,
                    level.base_required_accuracy * profile.accuracy_multiplier
                );
                assert_eq!(
                    state.effective_time_limit,
                    level.base_time_limit_secs * profile.time_multiplier
                );
                if state.is_final_level() {
                    break;
                }
                // force a pass so the walk covers levels Hard cannot clear
                state.phase = Phase::ResultsShown;
                ctl.advance(&mut state);
            }
        }
    }

    #[test]
    fn test_reset_to_menu_consumes_session() {
        let ctl = controller();
        let mut state = ctl.new_session("ana", Difficulty::Medium);
        ctl.start(&mut state);
        ctl.reset_to_menu(state);
        assert_eq!(ctl.store().submissions(), 0);
    }

    #[test]
    fn test_manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);
        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - t0, Duration::from_millis(1500));
    }
}
