//! Accuracy, speed, and score arithmetic for a single level attempt.
//!
//! Everything here is pure so the renderer can call it every frame for the
//! live accuracy readout and the controller can call it once per submit.

/// Characters per "word" in the words-per-minute approximation
pub const CHARS_PER_WORD: f64 = 5.0;

/// Number of positions where the typed text matches the sentence.
///
/// Only positions inside both strings are compared, so overtyping and
/// undertyping only lower the ratio. Comparison is exact (case and
/// whitespace sensitive).
pub fn correct_count(sentence: &str, typed: &str) -> usize {
    sentence
        .chars()
        .zip(typed.chars())
        .filter(|(expected, actual)| expected == actual)
        .count()
}

/// Percentage of the sentence typed correctly, in [0, 100]
pub fn accuracy_percent(sentence: &str, typed: &str) -> f64 {
    let len = sentence.chars().count();
    if len == 0 {
        return 0.0;
    }
    (correct_count(sentence, typed) as f64 / len as f64) * 100.0
}

pub fn words_per_minute(typed_chars: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (typed_chars as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0)
}

/// Points awarded for one submit, broken down for the results overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub base_score: i64,
    pub time_bonus: i64,
    pub level_score: i64,
}

/// Score a submit. Fractions are truncated toward zero at each step and the
/// time bonus goes negative once the limit is exceeded.
pub fn score_level(
    accuracy: f64,
    time_limit_secs: f64,
    elapsed_secs: f64,
    score_multiplier: f64,
    level: u8,
) -> ScoreBreakdown {
    let base_score = (accuracy * 10.0) as i64;
    let time_bonus = ((time_limit_secs - elapsed_secs) * 5.0) as i64;
    let level_multiplier = level as f64 * 0.5;
    let level_score =
        ((base_score + time_bonus) as f64 * score_multiplier * level_multiplier) as i64;

    ScoreBreakdown {
        base_score,
        time_bonus,
        level_score,
    }
}
