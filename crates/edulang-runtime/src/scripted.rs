//! Scripted answer source and recording reporter for testing.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::traits::{AnswerSource, QuizReporter};

/// Plays back a fixed list of answers, each after an optional delay.
///
/// Delays are measured from the moment the previous line was handed out, so
/// a countdown racing the source sees them on the tokio clock.
pub struct ScriptedAnswers {
    lines: VecDeque<(Duration, String)>,
    /// Deadline of the front line, fixed on first poll so a cancelled read
    /// resumes instead of restarting its delay.
    deadline: Option<Instant>,
    /// Block forever once exhausted instead of reporting a closed source.
    hang_when_empty: bool,
}

impl ScriptedAnswers {
    /// Answers delivered immediately, in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::timed(lines.into_iter().map(|l| (Duration::ZERO, l)))
    }

    /// Answers delivered after the given delay each.
    pub fn timed<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Duration, S)>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|(d, l)| (d, l.into())).collect(),
            deadline: None,
            hang_when_empty: false,
        }
    }

    /// Keep the source open after the last line, like a user who stopped typing.
    pub fn then_wait(mut self) -> Self {
        self.hang_when_empty = true;
        self
    }

    /// Lines not yet handed out.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl AnswerSource for ScriptedAnswers {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let Some(delay) = self.lines.front().map(|(d, _)| *d) else {
            if self.hang_when_empty {
                std::future::pending::<()>().await;
            }
            return Ok(None);
        };

        let deadline = *self.deadline.get_or_insert_with(|| Instant::now() + delay);
        tokio::time::sleep_until(deadline).await;

        self.deadline = None;
        Ok(self.lines.pop_front().map(|(_, line)| line))
    }
}

/// Something a [`RecordingReporter`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Question(String),
    Hint(String),
    NoHints,
    Incorrect(u32),
    Correct,
    Revealed(Vec<String>),
    TimedOut(Vec<String>),
    Exit,
}

/// Reporter that records every event for later assertions.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    /// Questions in the order they were asked.
    pub fn questions(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Question(q) => Some(q.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ReportEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl QuizReporter for RecordingReporter {
    fn on_question(&self, question: &str) {
        self.push(ReportEvent::Question(question.to_string()));
    }
    fn on_hint(&self, hint: &str) {
        self.push(ReportEvent::Hint(hint.to_string()));
    }
    fn on_no_hints(&self) {
        self.push(ReportEvent::NoHints);
    }
    fn on_incorrect(&self, attempts_left: u32) {
        self.push(ReportEvent::Incorrect(attempts_left));
    }
    fn on_correct(&self) {
        self.push(ReportEvent::Correct);
    }
    fn on_answers_revealed(&self, answers: &[String]) {
        self.push(ReportEvent::Revealed(answers.to_vec()));
    }
    fn on_timed_out(&self, answers: &[String]) {
        self.push(ReportEvent::TimedOut(answers.to_vec()));
    }
    fn on_exit(&self) {
        self.push(ReportEvent::Exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plays_back_then_closes() {
        let mut source = ScriptedAnswers::new(["a", "b"]);
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("a"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("b"));
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_read_keeps_its_line_and_deadline() {
        let start = Instant::now();
        let mut source = ScriptedAnswers::timed([(Duration::from_secs(5), "late")]);

        let cancelled =
            tokio::time::timeout(Duration::from_secs(2), source.next_line()).await;
        assert!(cancelled.is_err());
        assert_eq!(source.remaining(), 1);

        let line = source.next_line().await.unwrap();
        assert_eq!(line.as_deref(), Some("late"));
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }
}
