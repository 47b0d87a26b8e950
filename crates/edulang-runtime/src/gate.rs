//! Per-question terminal-state gate.
//!
//! The foreground answer loop and the countdown task both try to settle the
//! same question. [`QuestionGate::try_finish`] is the single compare-and-set
//! between them: the first caller closes the gate and applies its counter
//! update while still holding the lock, every later caller is refused.

use std::sync::{Mutex, MutexGuard, PoisonError};

use edulang_core::session::{Outcome, SessionCounters};

#[derive(Debug, Default)]
pub struct QuestionGate {
    state: Mutex<Option<Outcome>>,
}

impl QuestionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_none()
    }

    /// The outcome the question settled on, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        *self.lock()
    }

    /// Settle the question on `outcome` unless it already settled.
    ///
    /// Returns whether this call won. Counters are only touched by the winner.
    pub fn try_finish(&self, outcome: Outcome, counters: &SessionCounters) -> bool {
        let mut state = self.lock();
        if state.is_some() {
            return false;
        }
        *state = Some(outcome);
        counters.record(outcome);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Option<Outcome>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_finish_wins() {
        let counters = SessionCounters::new();
        let gate = QuestionGate::new();
        assert!(gate.is_open());
        assert!(gate.try_finish(Outcome::Correct, &counters));
        assert!(!gate.try_finish(Outcome::TimedOut, &counters));
        assert_eq!(gate.outcome(), Some(Outcome::Correct));
        assert_eq!(counters.snapshot().score, 1);
        assert_eq!(counters.snapshot().total_attempts, 1);
    }

    #[test]
    fn losing_exit_does_not_touch_counters() {
        let counters = SessionCounters::new();
        let gate = QuestionGate::new();
        assert!(gate.try_finish(Outcome::TimedOut, &counters));
        assert!(!gate.try_finish(Outcome::ExplicitExit, &counters));
        assert_eq!(gate.outcome(), Some(Outcome::TimedOut));
        assert_eq!(counters.snapshot().total_attempts, 1);
    }

    #[test]
    fn concurrent_finishers_settle_once() {
        for _ in 0..200 {
            let counters = Arc::new(SessionCounters::new());
            let gate = Arc::new(QuestionGate::new());

            let handles: Vec<_> = [Outcome::Correct, Outcome::TimedOut, Outcome::Exhausted]
                .into_iter()
                .cycle()
                .take(8)
                .map(|outcome| {
                    let gate = Arc::clone(&gate);
                    let counters = Arc::clone(&counters);
                    std::thread::spawn(move || gate.try_finish(outcome, &counters))
                })
                .collect();

            let winners = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count();

            assert_eq!(winners, 1);
            let snapshot = counters.snapshot();
            assert_eq!(snapshot.total_attempts, 1);
            let expected_score = u64::from(gate.outcome() == Some(Outcome::Correct));
            assert_eq!(snapshot.score, expected_score);
        }
    }
}
