//! The document model handed over by the script parser.
//!
//! A [`Document`] is the already-structured form of an edulang script: global
//! settings, variable declarations, load-time commands, and categories of
//! statements. Statement and value kinds are closed tagged variants so the
//! interpreter can match on them exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root of a parsed script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Countdown per quiz question, in seconds.
    #[serde(default)]
    pub timer: Option<f64>,
    /// Number of incorrect answers allowed per question.
    #[serde(default)]
    pub incorrect: Option<u32>,
    /// Variable declarations, in declaration order.
    #[serde(default)]
    pub variables: Vec<VariableDecl>,
    /// Top-level commands, run once at load time.
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Categories, in declaration order.
    #[serde(default)]
    pub categories: Vec<CategoryDecl>,
}

/// `name = value` binding usable from definitions and answer lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDecl {
    pub name: String,
    pub value: ValueNode,
}

/// A value that is either written out literally or refers to a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueNode {
    Literal(String),
    Reference(Reference),
    /// Any other node shape. Kept so resolution can reject it with a proper error.
    Unsupported(serde_json::Value),
}

impl ValueNode {
    pub fn literal(text: impl Into<String>) -> Self {
        ValueNode::Literal(text.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        ValueNode::Reference(Reference { name: name.into() })
    }
}

impl From<&str> for ValueNode {
    fn from(text: &str) -> Self {
        ValueNode::literal(text)
    }
}

/// Named reference to a variable, written `{ ref = "name" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(rename = "ref")]
    pub name: String,
}

/// Load-time session commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    ShowScore,
    ResetScore,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ShowScore => write!(f, "showScore"),
            Command::ResetScore => write!(f, "resetScore"),
        }
    }
}

/// A named group of statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryDecl {
    pub name: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// One statement inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Statement {
    /// `term` means `definition`.
    Define { term: String, definition: ValueNode },
    /// A question with one or more accepted answers.
    Quiz {
        question: String,
        #[serde(default)]
        answers: Vec<ValueNode>,
    },
    /// Hint for the most recent quiz in the same category.
    Hint { text: String },
    Comment {
        #[serde(default)]
        text: String,
    },
}

impl Statement {
    /// Short lowercase name of the statement kind, as written in scripts.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Define { .. } => "define",
            Statement::Quiz { .. } => "quiz",
            Statement::Hint { .. } => "hint",
            Statement::Comment { .. } => "comment",
        }
    }
}
