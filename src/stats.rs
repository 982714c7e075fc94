use std::time::SystemTime;

use crate::session::{Session, WordStatus};

/// Live metrics shown while typing; recomputed on every tick and every
/// accepted input mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveMetrics {
    pub wpm: u32,
    pub accuracy: u32,
}

/// Computed exactly once, when the countdown expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub score: u32,
}

/// Words committed so far, correct or not.
pub fn typed_word_count(session: &Session) -> usize {
    session
        .word_states
        .iter()
        .filter(|s| matches!(s.status, WordStatus::Correct | WordStatus::Incorrect))
        .count()
}

pub fn correct_word_count(session: &Session) -> usize {
    session
        .word_states
        .iter()
        .filter(|s| s.status == WordStatus::Correct)
        .count()
}

/// Pure function of the session's word states and the elapsed time. Before
/// the clock starts, or with effectively zero elapsed time, both metrics are
/// exactly zero rather than a division artifact.
pub fn live_metrics(session: &Session, now: SystemTime) -> LiveMetrics {
    let typed = typed_word_count(session);
    let correct = correct_word_count(session);

    let accuracy = if typed > 0 {
        (correct as f64 / typed as f64 * 100.0).round() as u32
    } else {
        0
    };

    let wpm = match session.started_at {
        Some(start) => {
            let elapsed_minutes = now
                .duration_since(start)
                .unwrap_or_default()
                .as_secs_f64()
                / 60.0;
            if elapsed_minutes > 0.0 {
                (typed as f64 / elapsed_minutes).round() as u32
            } else {
                0
            }
        }
        None => 0,
    };

    LiveMetrics { wpm, accuracy }
}

/// Scoring factor derived from accuracy, clamped below at 0.5. Accuracy never
/// exceeds 100, which naturally bounds the factor at 1.5.
pub fn accuracy_multiplier(accuracy: u32) -> f64 {
    (1.0 + (accuracy as f64 - 50.0) / 100.0).max(0.5)
}

pub fn score(wpm: u32, accuracy: u32) -> u32 {
    (wpm as f64 * 10.0 * accuracy_multiplier(accuracy)).round() as u32
}

pub fn final_result(session: &Session, now: SystemTime) -> FinalResult {
    let live = live_metrics(session, now);
    FinalResult {
        wpm: live.wpm,
        accuracy: live.accuracy,
        score: score(live.wpm, live.accuracy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session_with(words: &[&str], typed: &[&str]) -> Session {
        let mut s = Session::new(words.iter().map(|w| w.to_string()).collect(), 30);
        let t0 = SystemTime::UNIX_EPOCH;
        for input in typed {
            s.on_input(input, t0);
            s.commit_word(t0);
        }
        s
    }

    #[test]
    fn metrics_are_zero_before_start() {
        let s = Session::new(vec!["the".to_string()], 30);
        let m = live_metrics(&s, SystemTime::UNIX_EPOCH);

        assert_eq!(m, LiveMetrics { wpm: 0, accuracy: 0 });
    }

    #[test]
    fn zero_elapsed_time_yields_zero_wpm() {
        let s = session_with(&["the", "cat"], &["the"]);
        let m = live_metrics(&s, SystemTime::UNIX_EPOCH);

        assert_eq!(m.wpm, 0);
        assert_eq!(m.accuracy, 100);
    }

    #[test]
    fn wpm_counts_committed_words_per_minute() {
        let s = session_with(&["the", "cat", "sat"], &["the", "cat"]);
        let half_minute = SystemTime::UNIX_EPOCH + Duration::from_secs(30);

        assert_eq!(live_metrics(&s, half_minute).wpm, 4);
    }

    #[test]
    fn accuracy_counts_correct_share_of_committed() {
        let s = session_with(&["the", "cat", "sat", "mat"], &["the", "cxt", "sat"]);
        let m = live_metrics(&s, SystemTime::UNIX_EPOCH + Duration::from_secs(10));

        assert_eq!(m.accuracy, 67);
        assert!(m.accuracy <= 100);
    }

    #[test]
    fn perfect_accuracy_gives_max_multiplier() {
        assert_eq!(accuracy_multiplier(100), 1.5);
        assert_eq!(score(60, 100), 900);
    }

    #[test]
    fn midpoint_accuracy_is_neutral() {
        assert_eq!(accuracy_multiplier(50), 1.0);
        assert_eq!(score(40, 50), 400);
    }

    #[test]
    fn multiplier_is_floored_at_half() {
        assert_eq!(accuracy_multiplier(0), 0.5);
        assert_eq!(score(20, 0), 100);
    }

    #[test]
    fn final_result_combines_metrics_and_score() {
        let s = session_with(&["the", "cat"], &["the", "cat"]);
        let end = SystemTime::UNIX_EPOCH + Duration::from_secs(15);
        let result = final_result(&s, end);

        // 2 words in a quarter minute
        assert_eq!(result.wpm, 8);
        assert_eq!(result.accuracy, 100);
        assert_eq!(result.score, 120);
    }
}
