//! Interpretation error types.
//!
//! Both variants are load-time validation failures: the whole script is
//! rejected and no partial program is produced.

use thiserror::Error;

/// Errors that can occur while interpreting a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// A reference names a variable that was never declared.
    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    /// A value node is neither a literal string nor a variable reference.
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),
}

impl InterpretError {
    /// The variable name involved, if this is an undefined-variable error.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            InterpretError::UndefinedVariable(name) => Some(name),
            InterpretError::UnsupportedValueType(_) => None,
        }
    }
}
