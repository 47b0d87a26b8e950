//! edulang CLI: play, validate, and scaffold quiz scripts.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod console;

#[derive(Parser)]
#[command(name = "edulang", version, about = "Educational quiz scripting language")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a script and start an interactive quiz session
    Play {
        /// Path to a .toml or .json script
        #[arg(long)]
        script: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for shuffling "Test All Quizzes"
        #[arg(long)]
        seed: Option<u64>,

        /// Per-question timer in seconds (0 disables the timer)
        #[arg(long)]
        timer: Option<f64>,

        /// Incorrect answers allowed per question
        #[arg(long)]
        incorrect: Option<u32>,
    },

    /// Check scripts for errors and print a summary
    Validate {
        /// Path to a script file or directory
        #[arg(long)]
        script: PathBuf,
    },

    /// Create starter config and example script
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "edulang=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            script,
            config,
            seed,
            timer,
            incorrect,
        } => {
            let overrides = commands::play::Overrides {
                seed,
                timer_secs: timer,
                incorrect_limit: incorrect,
            };
            commands::play::execute(script, config, overrides).await
        }
        Commands::Validate { script } => commands::validate::execute(script),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
