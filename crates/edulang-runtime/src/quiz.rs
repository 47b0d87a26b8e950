//! The answer state machine for a single quiz question.
//!
//! A question starts open and settles on exactly one [`Outcome`]. When a timer
//! is configured, a countdown task races the foreground answer loop; both go
//! through the question's [`QuestionGate`], so whichever settles first wins
//! and the counters move once. The countdown is aborted on every other path.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;

use edulang_core::program::{Quiz, QuizSettings};
use edulang_core::session::{Outcome, SessionCounters};

use crate::batch::shuffled_order;
use crate::gate::QuestionGate;
use crate::traits::{AnswerSource, QuizReporter};

/// Typed to leave the current question without touching the score.
pub const EXIT_COMMAND: &str = "exit";
/// Typed to reveal the next hint. Does not use up an attempt.
pub const HINT_COMMAND: &str = "hint";

/// Configuration for the quiz runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Timer and incorrect-answer budget applied to every question.
    pub settings: QuizSettings,
    /// Shuffle quizzes when running a whole category.
    pub shuffle: bool,
    /// Seed for the shuffle. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new(QuizSettings::default())
    }
}

impl RunnerConfig {
    pub fn new(settings: QuizSettings) -> Self {
        Self {
            settings,
            shuffle: true,
            seed: None,
        }
    }
}

/// Runs quiz questions against shared session counters.
pub struct QuizRunner {
    config: RunnerConfig,
    counters: Arc<SessionCounters>,
    rng: Mutex<StdRng>,
}

impl QuizRunner {
    pub fn new(config: RunnerConfig, counters: Arc<SessionCounters>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            counters,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn counters(&self) -> &Arc<SessionCounters> {
        &self.counters
    }

    /// A fresh shuffle of `0..len` drawn from the runner's own RNG.
    pub(crate) fn shuffle_order(&self, len: usize) -> Vec<usize> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        shuffled_order(len, &mut *rng)
    }

    /// Ask one question until it settles.
    ///
    /// `hints` is the question's queue; hints handed out are gone for good.
    /// Fails only if reading from `input` fails.
    pub async fn ask(
        &self,
        quiz: &Quiz,
        hints: &mut VecDeque<String>,
        input: &mut dyn AnswerSource,
        reporter: &dyn QuizReporter,
    ) -> Result<Outcome> {
        reporter.on_question(&quiz.question);

        let gate = Arc::new(QuestionGate::new());
        let mut countdown = Countdown::start(self.config.settings.timer, &gate, &self.counters);
        let mut attempts_left = self.config.settings.incorrect_limit;

        while attempts_left > 0 && gate.is_open() {
            let line = tokio::select! {
                biased;
                _ = countdown.expired() => {
                    return Ok(self.settle(&gate, &mut countdown, Outcome::TimedOut, quiz, reporter));
                }
                line = input.next_line() => line?,
            };

            let Some(line) = line else {
                tracing::debug!(question = %quiz.question, "answer source closed");
                return Ok(self.settle(&gate, &mut countdown, Outcome::ExplicitExit, quiz, reporter));
            };

            if line.eq_ignore_ascii_case(EXIT_COMMAND) {
                return Ok(self.settle(&gate, &mut countdown, Outcome::ExplicitExit, quiz, reporter));
            }

            if line.eq_ignore_ascii_case(HINT_COMMAND) {
                match hints.pop_front() {
                    Some(hint) => reporter.on_hint(&hint),
                    None => reporter.on_no_hints(),
                }
                continue;
            }

            if quiz.accepts(&line) {
                return Ok(self.settle(&gate, &mut countdown, Outcome::Correct, quiz, reporter));
            }

            attempts_left -= 1;
            reporter.on_incorrect(attempts_left);
        }

        Ok(self.settle(&gate, &mut countdown, Outcome::Exhausted, quiz, reporter))
    }

    /// Try to settle on `requested`. If the countdown got there first the
    /// question is reported as timed out instead.
    fn settle(
        &self,
        gate: &QuestionGate,
        countdown: &mut Countdown,
        requested: Outcome,
        quiz: &Quiz,
        reporter: &dyn QuizReporter,
    ) -> Outcome {
        let outcome = if gate.try_finish(requested, &self.counters) {
            requested
        } else {
            gate.outcome().unwrap_or(requested)
        };
        countdown.cancel();

        match outcome {
            Outcome::Correct => reporter.on_correct(),
            Outcome::Exhausted => reporter.on_answers_revealed(&quiz.answers),
            Outcome::TimedOut => reporter.on_timed_out(&quiz.answers),
            Outcome::ExplicitExit => reporter.on_exit(),
        }

        tracing::debug!(question = %quiz.question, %outcome, "question settled");
        outcome
    }
}

/// Background countdown for one question. Aborted when dropped.
struct Countdown {
    handle: Option<JoinHandle<bool>>,
}

impl Countdown {
    fn start(
        duration: Option<Duration>,
        gate: &Arc<QuestionGate>,
        counters: &Arc<SessionCounters>,
    ) -> Self {
        let handle = duration.map(|duration| {
            let gate = Arc::clone(gate);
            let counters = Arc::clone(counters);
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                gate.try_finish(Outcome::TimedOut, &counters)
            })
        });
        Self { handle }
    }

    /// Resolves once the countdown task has run. Never resolves without a timer.
    async fn expired(&mut self) {
        match self.handle.as_mut() {
            Some(handle) => {
                if let Err(e) = handle.await {
                    tracing::warn!("countdown task failed: {e}");
                }
                self.handle = None;
            }
            None => std::future::pending().await,
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
