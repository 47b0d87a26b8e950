//! Session counters shared between the interpreter and the quiz runtime.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How a single quiz question ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// An accepted answer was given.
    Correct,
    /// The incorrect-answer budget ran out.
    Exhausted,
    /// The countdown fired before the question was settled.
    TimedOut,
    /// The user asked to leave. Counters are left untouched.
    ExplicitExit,
}

impl Outcome {
    /// Whether this outcome counts towards `total_attempts`.
    pub fn counts_as_attempt(self) -> bool {
        !matches!(self, Outcome::ExplicitExit)
    }

    /// Whether a batch run should stop after this outcome.
    pub fn ends_batch(self) -> bool {
        matches!(self, Outcome::ExplicitExit)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Exhausted => write!(f, "exhausted"),
            Outcome::TimedOut => write!(f, "timed out"),
            Outcome::ExplicitExit => write!(f, "exit"),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSnapshot {
    /// Correct answers.
    pub score: u64,
    /// Questions that reached a terminal outcome other than an explicit exit.
    pub total_attempts: u64,
}

impl ScoreSnapshot {
    /// Score as a percentage of attempts, or `None` before the first attempt.
    pub fn percentage(&self) -> Option<f64> {
        if self.total_attempts == 0 {
            return None;
        }
        Some(self.score as f64 / self.total_attempts as f64 * 100.0)
    }
}

impl fmt::Display for ScoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage() {
            Some(pct) => write!(f, "{}/{} ({pct:.2}%)", self.score, self.total_attempts),
            None => write!(f, "{}/{}", self.score, self.total_attempts),
        }
    }
}

/// Score and attempt counters for one running session.
///
/// Shared between the foreground quiz loop and the countdown task, so every
/// access goes through a mutex.
#[derive(Debug, Default)]
pub struct SessionCounters {
    inner: Mutex<ScoreSnapshot>,
}

impl SessionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        *self.lock()
    }

    /// Zero both score and attempts.
    pub fn reset(&self) {
        *self.lock() = ScoreSnapshot::default();
    }

    /// Zero the score only. Attempts are kept.
    pub fn reset_score(&self) {
        self.lock().score = 0;
    }

    /// Apply the counter update for a settled question.
    pub fn record(&self, outcome: Outcome) {
        let mut counters = self.lock();
        if outcome == Outcome::Correct {
            counters.score += 1;
        }
        if outcome.counts_as_attempt() {
            counters.total_attempts += 1;
        }
    }

    // A panic while holding the lock cannot leave two plain integers torn.
    fn lock(&self) -> MutexGuard<'_, ScoreSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receives the effects of load-time session commands.
pub trait SessionEvents: Send + Sync {
    fn on_show_score(&self, snapshot: ScoreSnapshot);
    fn on_score_reset(&self);
}

/// Ignores session events.
pub struct NoopEvents;

impl SessionEvents for NoopEvents {
    fn on_show_score(&self, _: ScoreSnapshot) {}
    fn on_score_reset(&self) {}
}
