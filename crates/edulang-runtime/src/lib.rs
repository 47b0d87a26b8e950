//! edulang-runtime: Timed quiz runtime and batch runner.
//!
//! Presents one question at a time, races the user's answer against an
//! optional countdown, enforces the incorrect-answer budget, and settles the
//! session counters exactly once per question.

pub mod batch;
pub mod gate;
pub mod quiz;
pub mod scripted;
pub mod traits;

pub use batch::{BatchOutcome, BatchSummary};
pub use edulang_core::session::Outcome;
pub use quiz::{QuizRunner, RunnerConfig};
pub use traits::{AnswerSource, NoopReporter, QuizReporter};
