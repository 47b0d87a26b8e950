//! Program interpreter.
//!
//! Walks a [`Document`] once and builds the [`Program`]: applies global
//! settings, fills the variable table, runs load-time commands against the
//! session counters, and groups statements into categories. The first value
//! that fails to resolve aborts the whole interpretation.

use std::time::Duration;

use crate::document::{CategoryDecl, Command, Document, Statement};
use crate::error::InterpretError;
use crate::program::{Category, Program, Quiz, DEFAULT_INCORRECT_LIMIT};
use crate::resolver::{resolve, resolve_all, VariableTable};
use crate::session::{SessionCounters, SessionEvents};

/// Interpret a document into a program.
///
/// `counters` are only touched by the document's top-level `resetScore`
/// commands; `events` receives what `showScore`/`resetScore` report.
pub fn interpret(
    document: &Document,
    counters: &SessionCounters,
    events: &dyn SessionEvents,
) -> Result<Program, InterpretError> {
    let mut program = Program::new(
        timer_duration(document.timer),
        document.incorrect.unwrap_or(DEFAULT_INCORRECT_LIMIT),
    );

    program.variables = build_variable_table(document)?;

    for command in &document.commands {
        run_command(*command, counters, events);
    }

    for decl in &document.categories {
        let category = build_category(decl, &program.variables)?;
        program.insert_category(category);
    }

    tracing::info!(
        categories = program.categories().len(),
        variables = program.variables.len(),
        timer = ?program.timer,
        incorrect_limit = program.incorrect_limit,
        "program loaded"
    );

    Ok(program)
}

/// Seconds to a question timer. Anything not finite and positive means no timer.
pub fn timer_duration(secs: Option<f64>) -> Option<Duration> {
    let secs = secs?;
    if !secs.is_finite() || secs <= 0.0 {
        tracing::debug!("no timer: {secs}s is not a positive duration");
        return None;
    }
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => Some(duration),
        Err(e) => {
            tracing::warn!("ignoring timer of {secs}s: {e}");
            None
        }
    }
}

/// Variables may refer to variables declared before them. Later duplicates win.
fn build_variable_table(document: &Document) -> Result<VariableTable, InterpretError> {
    let mut variables = VariableTable::new();
    for decl in &document.variables {
        let value = resolve(&decl.value, &variables)?;
        variables.insert(decl.name.clone(), value);
    }
    Ok(variables)
}

fn run_command(command: Command, counters: &SessionCounters, events: &dyn SessionEvents) {
    tracing::debug!(%command, "running load-time command");
    match command {
        Command::ShowScore => events.on_show_score(counters.snapshot()),
        Command::ResetScore => {
            counters.reset_score();
            events.on_score_reset();
        }
    }
}

fn build_category(decl: &CategoryDecl, variables: &VariableTable) -> Result<Category, InterpretError> {
    let mut category = Category::new(decl.name.clone());
    let mut current_quiz: Option<&str> = None;

    for statement in &decl.statements {
        tracing::debug!(category = %decl.name, kind = statement.kind(), "statement");
        match statement {
            Statement::Define { term, definition } => {
                let text = resolve(definition, variables)?;
                category.define(term.clone(), text);
            }
            Statement::Quiz { question, answers } => {
                let answers = resolve_all(answers, variables)?;
                category.add_quiz(Quiz::new(question.clone(), answers));
                current_quiz = Some(question.as_str());
            }
            Statement::Hint { text } => match current_quiz {
                Some(question) => {
                    category.add_hint(question, text.clone());
                }
                None => {
                    tracing::warn!(category = %decl.name, "dropping hint declared before any quiz");
                }
            },
            Statement::Comment { .. } => {}
        }
    }

    Ok(category)
}
