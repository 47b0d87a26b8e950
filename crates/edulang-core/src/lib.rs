//! edulang-core: Document model, variable resolution, and program interpreter.
//!
//! This crate turns a parsed edulang script into an in-memory [`program::Program`]
//! and owns the session counters that the quiz runtime updates.

pub mod document;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod program;
pub mod resolver;
pub mod session;

pub use error::InterpretError;
pub use interpreter::interpret;
pub use program::{Category, Program, Quiz, QuizSettings};
pub use session::{Outcome, ScoreSnapshot, SessionCounters, SessionEvents};
