use std::time::Instant;

use crate::levels::{self, Difficulty, LevelDefinition};
use crate::scoring::{self, ScoreBreakdown};

/// Where a play-through currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Level loaded, timer not running
    Idle,
    /// Timer running, keystrokes accepted
    Active { started_at: Instant },
    /// Level passed, waiting for the player to advance
    ResultsShown,
    /// Final level passed
    Won,
}

impl Phase {
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Active { .. })
    }
}

/// Snapshot taken at the last submit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelResult {
    pub accuracy: f64,
    pub wpm: f64,
    pub elapsed_secs: f64,
    pub score: ScoreBreakdown,
    pub passed: bool,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub current_level: u8,
    pub effective_time_limit: f64,
    pub effective_required_accuracy: f64,
    pub typed_text: String,
    pub phase: Phase,
    pub total_score: i64,
    pub stars_earned: u32,
    pub last_result: Option<LevelResult>,
    /// Submits made on the current level
    pub attempts: u32,
}

impl SessionState {
    pub fn new(player_name: impl Into<String>, difficulty: Difficulty) -> Self {
        let mut state = Self {
            player_name: player_name.into(),
            difficulty,
            current_level: 1,
            effective_time_limit: 0.0,
            effective_required_accuracy: 0.0,
            typed_text: String::new(),
            phase: Phase::Idle,
            total_score: 0,
            stars_earned: 0,
            last_result: None,
            attempts: 0,
        };
        state.enter_level(1);
        state
    }

    /// Load `level` and recompute its effective goals for this difficulty.
    /// Levels outside the catalog are clamped into range.
    pub(crate) fn enter_level(&mut self, level: u8) {
        self.current_level = level.clamp(1, levels::MAX_LEVEL);
        let (time_limit, required_accuracy) =
            levels::effective_goals(self.level_definition(), self.difficulty);
        self.effective_time_limit = time_limit;
        self.effective_required_accuracy = required_accuracy;
        self.typed_text.clear();
        self.attempts = 0;
        self.phase = Phase::Idle;
    }

    pub fn level_definition(&self) -> &'static LevelDefinition {
        levels::level_clamped(self.current_level)
    }

    pub fn sentence(&self) -> &'static str {
        self.level_definition().sentence
    }

    pub fn is_final_level(&self) -> bool {
        self.current_level >= levels::MAX_LEVEL
    }

    /// Accuracy of what has been typed so far against the current sentence
    pub fn live_accuracy(&self) -> f64 {
        scoring::accuracy_percent(self.sentence(), &self.typed_text)
    }

    /// Seconds since the timer started, 0 when it is not running
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match self.phase {
            Phase::Active { started_at } => now.saturating_duration_since(started_at).as_secs_f64(),
            _ => 0.0,
        }
    }

    /// Countdown for display, clamped at zero. Running out of time does not
    /// end the attempt; it only eats into the time bonus.
    pub fn time_remaining(&self, now: Instant) -> f64 {
        (self.effective_time_limit - self.elapsed_secs(now)).max(0.0)
    }

    pub fn is_over_time(&self, now: Instant) -> bool {
        self.phase.is_active() && self.elapsed_secs(now) > self.effective_time_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_session_starts_idle_at_level_one() {
        let state = SessionState::new("ana", Difficulty::Medium);

        assert_eq!(state.player_name, "ana");
        assert_eq!(state.current_level, 1);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.sentence(), "Hello Start typing to level up");
        assert_eq!(state.effective_time_limit, 999.0);
        assert_eq!(state.effective_required_accuracy, 70.0);
        assert_eq!(state.total_score, 0);
        assert_eq!(state.stars_earned, 0);
        assert!(state.last_result.is_none());
        assert!(state.typed_text.is_empty());
    }

    #[test]
    fn test_enter_level_applies_difficulty() {
        let mut state = SessionState::new("ana", Difficulty::Hard);
        state.enter_level(2);

        assert_eq!(state.current_level, 2);
        assert!((state.effective_time_limit - 42.0).abs() < 1e-9);
        assert!((state.effective_required_accuracy - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_enter_level_clamps_and_clears_input() {
        let mut state = SessionState::new("ana", Difficulty::Easy);
        state.typed_text.push_str("leftover");
        state.attempts = 3;

        state.enter_level(42);

        assert_eq!(state.current_level, 10);
        assert!(state.typed_text.is_empty());
        assert_eq!(state.attempts, 0);
        assert_eq!(state.sentence(), "Congratulations Master Typist Achieved");
    }

    #[test]
    fn test_live_accuracy_tracks_typed_text() {
        let mut state = SessionState::new("ana", Difficulty::Medium);
        assert_eq!(state.live_accuracy(), 0.0);

        state.typed_text.push_str("Hello Start typing to level up");
        assert_eq!(state.live_accuracy(), 100.0);
    }

    #[test]
    fn test_timer_is_derived_from_phase() {
        let mut state = SessionState::new("ana", Difficulty::Medium);
        let start = Instant::now();
        let later = start + Duration::from_secs(10);

        assert_eq!(state.elapsed_secs(later), 0.0);
        assert_eq!(state.time_remaining(later), 999.0);

        state.phase = Phase::Active { started_at: start };
        assert_eq!(state.elapsed_secs(later), 10.0);
        assert_eq!(state.time_remaining(later), 989.0);
        assert!(!state.is_over_time(later));
    }

    #[test]
    fn test_time_remaining_clamps_at_zero() {
        let mut state = SessionState::new("ana", Difficulty::Medium);
        state.enter_level(10);
        let start = Instant::now();
        state.phase = Phase::Active { started_at: start };

        let late = start + Duration::from_secs(25);
        assert_eq!(state.time_remaining(late), 0.0);
        assert!(state.is_over_time(late));
    }
}
