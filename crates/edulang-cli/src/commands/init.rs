//! The `edulang init` command.

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    // Create edulang.toml
    if std::path::Path::new("edulang.toml").exists() {
        println!("edulang.toml already exists, skipping.");
    } else {
        std::fs::write("edulang.toml", SAMPLE_CONFIG).context("failed to write edulang.toml")?;
        println!("Created edulang.toml");
    }

    // Create example script
    std::fs::create_dir_all("scripts").context("failed to create scripts/")?;
    let example_path = std::path::Path::new("scripts/example.toml");
    if example_path.exists() {
        println!("scripts/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SCRIPT)
            .context("failed to write scripts/example.toml")?;
        println!("Created scripts/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: edulang validate --script scripts/example.toml");
    println!("  2. Run: edulang play --script scripts/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# edulang configuration

# Shuffle the order of "Test All Quizzes".
shuffle = true

# Fix the shuffle seed for a reproducible session.
# seed = 42

# Override the script's timer and incorrect-answer budget.
# timer_secs = 20.0
# incorrect_limit = 3
"#;

const EXAMPLE_SCRIPT: &str = include_str!("../../../../scripts/example.toml");
