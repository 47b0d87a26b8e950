//! Script loader.
//!
//! Loads edulang documents from TOML or JSON files and directories, and
//! validates them for common authoring mistakes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::document::{Document, Statement, ValueNode};

/// On-disk encoding of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    Toml,
    Json,
}

impl ScriptFormat {
    /// Pick the format from a file extension. Anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ScriptFormat::Json,
            _ => ScriptFormat::Toml,
        }
    }
}

/// Parse a single script file into a `Document`.
pub fn parse_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script file: {}", path.display()))?;

    parse_document_str(&content, ScriptFormat::from_path(path), path)
}

/// Parse script text into a `Document` (useful for testing).
pub fn parse_document_str(
    content: &str,
    format: ScriptFormat,
    source_path: &Path,
) -> Result<Document> {
    let document: Document = match format {
        ScriptFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        ScriptFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };
    Ok(document)
}

/// Recursively load all `.toml` and `.json` scripts from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_document_directory(dir: &Path) -> Result<Vec<(std::path::PathBuf, Document)>> {
    let mut documents = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            documents.extend(load_document_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_document(&path) {
                Ok(document) => documents.push((path, document)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(documents)
}

/// A warning from script validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The category (if applicable).
    pub category: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn global(message: String) -> Self {
        Self {
            category: None,
            message,
        }
    }

    fn in_category(category: &str, message: String) -> Self {
        Self {
            category: Some(category.to_string()),
            message,
        }
    }
}

/// Validate a document for common issues.
///
/// Nothing reported here stops a script from loading; unresolved variables
/// are caught by interpretation instead.
pub fn validate_document(document: &Document) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Some(secs) = document.timer {
        if !secs.is_finite() || secs <= 0.0 {
            warnings.push(ValidationWarning::global(format!(
                "timer of {secs}s is not positive and will be ignored"
            )));
        } else if std::time::Duration::try_from_secs_f64(secs).is_err() {
            warnings.push(ValidationWarning::global(format!(
                "timer of {secs}s is too large and will be ignored"
            )));
        }
    }

    let mut seen_vars = HashSet::new();
    for var in &document.variables {
        if !seen_vars.insert(var.name.as_str()) {
            warnings.push(ValidationWarning::global(format!(
                "variable '{}' is declared more than once; the last declaration wins",
                var.name
            )));
        }
    }

    let mut seen_categories = HashSet::new();
    for category in &document.categories {
        let name = category.name.as_str();
        if !seen_categories.insert(name) {
            warnings.push(ValidationWarning::in_category(
                name,
                format!("duplicate category '{name}' replaces the earlier one"),
            ));
        }

        let mut seen_terms = HashSet::new();
        let mut seen_quiz = false;
        for statement in &category.statements {
            match statement {
                Statement::Define { term, .. } => {
                    if !seen_terms.insert(term.as_str()) {
                        warnings.push(ValidationWarning::in_category(
                            name,
                            format!("term '{term}' is defined more than once"),
                        ));
                    }
                }
                Statement::Quiz { question, answers } => {
                    seen_quiz = true;
                    if answers.is_empty() {
                        warnings.push(ValidationWarning::in_category(
                            name,
                            format!("quiz '{question}' has no accepted answers"),
                        ));
                    }
                    if answers.iter().any(|a| matches!(a, ValueNode::Unsupported(_))) {
                        warnings.push(ValidationWarning::in_category(
                            name,
                            format!("quiz '{question}' has an answer that is not text"),
                        ));
                    }
                }
                Statement::Hint { text } => {
                    if !seen_quiz {
                        warnings.push(ValidationWarning::in_category(
                            name,
                            format!("hint '{text}' comes before any quiz and will be dropped"),
                        ));
                    }
                }
                Statement::Comment { .. } => {}
            }
        }
    }

    warnings
}
