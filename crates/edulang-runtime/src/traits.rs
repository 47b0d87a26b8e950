//! Seams between the quiz runtime and the outside world.
//!
//! The runtime reads answers from an [`AnswerSource`] and reports everything
//! the user should see through a [`QuizReporter`]. The CLI implements both on
//! top of stdin/stdout; tests use the scripted implementations.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Answer source
// ---------------------------------------------------------------------------

/// Where answers come from.
///
/// `next_line` must be cancel-safe: when the countdown fires the runtime
/// drops the pending call, and no line may be lost because of that.
#[async_trait]
pub trait AnswerSource: Send {
    /// Next line of input without its line terminator, or `None` once the
    /// source is closed.
    async fn next_line(&mut self) -> std::io::Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Receives what happens while a question is open.
pub trait QuizReporter: Send + Sync {
    fn on_question(&self, question: &str);
    fn on_hint(&self, hint: &str);
    fn on_no_hints(&self);
    fn on_incorrect(&self, attempts_left: u32);
    fn on_correct(&self);
    /// The attempt budget ran out.
    fn on_answers_revealed(&self, answers: &[String]);
    fn on_timed_out(&self, answers: &[String]);
    fn on_exit(&self);
}

/// No-op reporter.
pub struct NoopReporter;

impl QuizReporter for NoopReporter {
    fn on_question(&self, _: &str) {}
    fn on_hint(&self, _: &str) {}
    fn on_no_hints(&self) {}
    fn on_incorrect(&self, _: u32) {}
    fn on_correct(&self) {}
    fn on_answers_revealed(&self, _: &[String]) {}
    fn on_timed_out(&self, _: &[String]) {}
    fn on_exit(&self) {}
}
