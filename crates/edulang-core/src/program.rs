//! The in-memory program built by the interpreter.
//!
//! A [`Program`] owns its categories; each [`Category`] owns its definitions,
//! its quizzes in declaration order, and one hint queue per question text.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::resolver::VariableTable;

/// Incorrect answers allowed per question when the script does not say.
pub const DEFAULT_INCORRECT_LIMIT: u32 = 2;

/// A fully interpreted script.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Countdown applied to every quiz question.
    pub timer: Option<Duration>,
    /// Incorrect answers allowed per question.
    pub incorrect_limit: u32,
    /// Resolved variables.
    pub variables: VariableTable,
    categories: Vec<Category>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new(None, DEFAULT_INCORRECT_LIMIT)
    }
}

impl Program {
    /// An empty program with the given global settings.
    pub fn new(timer: Option<Duration>, incorrect_limit: u32) -> Self {
        Self {
            timer,
            incorrect_limit,
            variables: VariableTable::new(),
            categories: Vec::new(),
        }
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut [Category] {
        &mut self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Add a category. A category with the same name is replaced in place,
    /// keeping its original position.
    pub fn insert_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.name == category.name) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    /// Quiz settings taken from the script's global declarations.
    pub fn settings(&self) -> QuizSettings {
        QuizSettings {
            timer: self.timer,
            incorrect_limit: self.incorrect_limit,
        }
    }
}

/// Settings applied uniformly to every quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    pub timer: Option<Duration>,
    pub incorrect_limit: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            timer: None,
            incorrect_limit: DEFAULT_INCORRECT_LIMIT,
        }
    }
}

impl QuizSettings {
    /// Replace the timer and/or limit where an override is given.
    pub fn with_overrides(mut self, timer: Option<Duration>, incorrect_limit: Option<u32>) -> Self {
        if timer.is_some() {
            self.timer = timer;
        }
        if let Some(limit) = incorrect_limit {
            self.incorrect_limit = limit;
        }
        self
    }
}

/// A term and its resolved definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub term: String,
    pub text: String,
}

/// A question and its accepted answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub question: String,
    /// Accepted answers, already resolved. Order is kept for display only.
    pub answers: Vec<String>,
}

impl Quiz {
    pub fn new(question: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            question: question.into(),
            answers,
        }
    }

    /// Whether `input` is an accepted answer.
    ///
    /// Surrounding whitespace is trimmed from the input only; the comparison
    /// itself is exact and case-sensitive.
    pub fn accepts(&self, input: &str) -> bool {
        let input = input.trim();
        self.answers.iter().any(|a| a == input)
    }

}

/// A named group of definitions, quizzes, and hint queues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub name: String,
    definitions: Vec<Definition>,
    quizzes: Vec<Quiz>,
    hints: HashMap<String, VecDeque<String>>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Definitions in the order their terms were first declared.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn definition(&self, term: &str) -> Option<&str> {
        self.definitions
            .iter()
            .find(|d| d.term == term)
            .map(|d| d.text.as_str())
    }

    /// Store a definition. Redefining a term overwrites its text.
    pub fn define(&mut self, term: impl Into<String>, text: impl Into<String>) {
        let term = term.into();
        let text = text.into();
        match self.definitions.iter_mut().find(|d| d.term == term) {
            Some(existing) => existing.text = text,
            None => self.definitions.push(Definition { term, text }),
        }
    }

    /// Quizzes in declaration order.
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    /// Append a quiz and open a fresh, empty hint queue for its question.
    pub fn add_quiz(&mut self, quiz: Quiz) {
        self.hints.insert(quiz.question.clone(), VecDeque::new());
        self.quizzes.push(quiz);
    }

    /// Append a hint to the queue of `question`. Returns false if no quiz with
    /// that question has been added.
    pub fn add_hint(&mut self, question: &str, hint: impl Into<String>) -> bool {
        match self.hints.get_mut(question) {
            Some(queue) => {
                queue.push_back(hint.into());
                true
            }
            None => false,
        }
    }

    /// Remaining hints for a question.
    pub fn hints_for(&self, question: &str) -> Option<&VecDeque<String>> {
        self.hints.get(question)
    }

    /// The quiz at `index` together with its depletable hint queue.
    pub fn quiz_and_hints_mut(&mut self, index: usize) -> Option<(&Quiz, &mut VecDeque<String>)> {
        let quiz = self.quizzes.get(index)?;
        let hints = self.hints.entry(quiz.question.clone()).or_default();
        Some((quiz, hints))
    }

    /// Total hints still queued across all questions.
    pub fn remaining_hints(&self) -> usize {
        self.hints.values().map(VecDeque::len).sum()
    }
}
