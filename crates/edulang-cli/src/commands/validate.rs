//! The `edulang validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use edulang_core::parser::{load_document_directory, parse_document, validate_document};
use edulang_core::session::NoopEvents;
use edulang_core::{Program, SessionCounters};

pub fn execute(script_path: PathBuf) -> Result<()> {
    let documents = if script_path.is_dir() {
        load_document_directory(&script_path)?
    } else {
        vec![(script_path.clone(), parse_document(&script_path)?)]
    };

    let mut total_warnings = 0;
    let mut failures = 0;

    for (path, document) in &documents {
        println!("Script: {}", path.display());

        let warnings = validate_document(document);
        for w in &warnings {
            let prefix = w
                .category
                .as_ref()
                .map(|name| format!("  [{name}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();

        // Load-time commands run against throwaway counters and print nothing.
        match edulang_core::interpret(document, &SessionCounters::new(), &NoopEvents) {
            Ok(program) => print_summary(&program),
            Err(e) => {
                println!("  ERROR: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} script(s) failed to load");
    }

    if total_warnings == 0 {
        println!("All scripts valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_summary(program: &Program) {
    let timer = program
        .timer
        .map(|t| format!("{}s", t.as_secs_f64()))
        .unwrap_or_else(|| "none".to_string());
    println!(
        "  {} categories, timer: {timer}, incorrect answers allowed: {}",
        program.categories().len(),
        program.incorrect_limit
    );

    let mut table = Table::new();
    table.set_header(vec!["Category", "Definitions", "Quizzes", "Hints"]);

    for category in program.categories() {
        table.add_row(vec![
            Cell::new(&category.name),
            Cell::new(category.definitions().len()),
            Cell::new(category.quizzes().len()),
            Cell::new(category.remaining_hints()),
        ]);
    }

    println!("{table}");
}
