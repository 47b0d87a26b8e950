//! The `edulang play` command: an interactive menu session over one script.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncRead;

use edulang_core::interpreter::timer_duration;
use edulang_core::{Program, SessionCounters};
use edulang_runtime::{BatchOutcome, QuizReporter, QuizRunner, RunnerConfig};

use crate::config::{load_config_from, EdulangConfig};
use crate::console::{ConsoleEvents, ConsoleInput, ConsoleReporter};

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub timer_secs: Option<f64>,
    pub incorrect_limit: Option<u32>,
}

pub async fn execute(
    script: PathBuf,
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let document = edulang_core::parser::parse_document(&script)?;

    let counters = Arc::new(SessionCounters::new());
    let mut program = edulang_core::interpret(&document, &counters, &ConsoleEvents)
        .with_context(|| format!("failed to load script: {}", script.display()))?;

    let runner = QuizRunner::new(runner_config(&program, &config, &overrides), counters);
    let mut input = ConsoleInput::stdin();

    Session {
        program: &mut program,
        runner: &runner,
        input: &mut input,
        reporter: &ConsoleReporter,
    }
    .run()
    .await
}

/// Script settings, then the config file, then the command line.
fn runner_config(program: &Program, config: &EdulangConfig, overrides: &Overrides) -> RunnerConfig {
    let mut settings = program
        .settings()
        .with_overrides(None, overrides.incorrect_limit.or(config.incorrect_limit));
    if let Some(secs) = overrides.timer_secs.or(config.timer_secs) {
        settings.timer = timer_duration(Some(secs));
    }

    RunnerConfig {
        settings,
        shuffle: config.shuffle,
        seed: overrides.seed.or(config.seed),
    }
}

/// A menu entry that does not exist. Always answered by prompting again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum InvalidMenuChoice {
    #[error("Invalid option '{0}'. Please try again.")]
    UnknownOption(String),
    #[error("Invalid choice '{0}'.")]
    BadSelection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    ViewCategories,
    ShowScore,
    ResetScore,
    Exit,
}

impl FromStr for MainChoice {
    type Err = InvalidMenuChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::ViewCategories),
            "2" => Ok(Self::ShowScore),
            "3" => Ok(Self::ResetScore),
            "4" => Ok(Self::Exit),
            other => Err(InvalidMenuChoice::UnknownOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryChoice {
    ViewDefinitions,
    TestAll,
    ChooseQuiz,
    Back,
}

impl FromStr for CategoryChoice {
    type Err = InvalidMenuChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::ViewDefinitions),
            "2" => Ok(Self::TestAll),
            "3" => Ok(Self::ChooseQuiz),
            "4" => Ok(Self::Back),
            other => Err(InvalidMenuChoice::UnknownOption(other.to_string())),
        }
    }
}

/// An entry picked from a numbered list, or `back`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Index(usize),
    Back,
}

/// Parse a 1-based list number or `back` against a list of `len` entries.
fn parse_selection(input: &str, len: usize) -> Result<Selection, InvalidMenuChoice> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("back") {
        return Ok(Selection::Back);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Selection::Index(n - 1)),
        _ => Err(InvalidMenuChoice::BadSelection(input.to_string())),
    }
}

/// Where a submenu sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Back,
    /// Input closed; leave every menu.
    Quit,
}

struct Session<'a, R> {
    program: &'a mut Program,
    runner: &'a QuizRunner,
    input: &'a mut ConsoleInput<R>,
    reporter: &'a dyn QuizReporter,
}

impl<R: AsyncRead + Unpin + Send> Session<'_, R> {
    async fn run(mut self) -> Result<()> {
        loop {
            println!("\nMain Menu:");
            println!("1. View Categories");
            println!("2. Show Score");
            println!("3. Reset Score");
            println!("4. Exit");
            let Some(line) = self.input.prompt("Choose an option: ").await? else {
                break;
            };

            match line.parse::<MainChoice>() {
                Ok(MainChoice::ViewCategories) => {
                    if self.choose_category().await? == Nav::Quit {
                        break;
                    }
                }
                Ok(MainChoice::ShowScore) => {
                    let snapshot = self.runner.counters().snapshot();
                    if snapshot.total_attempts == 0 {
                        println!("No questions attempted yet.");
                    } else {
                        println!("Your current score is: {snapshot}");
                    }
                }
                Ok(MainChoice::ResetScore) => {
                    self.runner.counters().reset();
                    println!("Score and attempts have been reset.");
                }
                Ok(MainChoice::Exit) => break,
                Err(e) => println!("{e}"),
            }
        }

        println!("Exiting program. Goodbye!");
        Ok(())
    }

    async fn choose_category(&mut self) -> Result<Nav> {
        loop {
            println!("\nCategories:");
            for (i, category) in self.program.categories().iter().enumerate() {
                println!("{}. {}", i + 1, category.name);
            }
            let Some(line) = self
                .input
                .prompt("Choose a category or type 'back' to return: ")
                .await?
            else {
                return Ok(Nav::Quit);
            };

            match parse_selection(&line, self.program.categories().len()) {
                Ok(Selection::Back) => return Ok(Nav::Back),
                Ok(Selection::Index(index)) => {
                    if self.category_menu(index).await? == Nav::Quit {
                        return Ok(Nav::Quit);
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
    }

    async fn category_menu(&mut self, index: usize) -> Result<Nav> {
        loop {
            let name = self.program.categories()[index].name.clone();
            println!("\n{name} Menu:");
            println!("1. View Definitions");
            println!("2. Test All Quizzes");
            println!("3. Choose a Quiz");
            println!("4. Back to Categories");
            let Some(line) = self.input.prompt("Choose an option: ").await? else {
                return Ok(Nav::Quit);
            };

            match line.parse::<CategoryChoice>() {
                Ok(CategoryChoice::ViewDefinitions) => {
                    println!("\nDefinitions:");
                    for definition in self.program.categories()[index].definitions() {
                        println!("- {}: {}", definition.term, definition.text);
                    }
                }
                Ok(CategoryChoice::TestAll) => {
                    let category = &mut self.program.categories_mut()[index];
                    let summary = self
                        .runner
                        .run_category(category, &mut *self.input, self.reporter)
                        .await?;
                    if summary.outcome == BatchOutcome::ExitedEarly {
                        println!("Exiting test early...");
                    }
                }
                Ok(CategoryChoice::ChooseQuiz) => {
                    if self.choose_quiz(index).await? == Nav::Quit {
                        return Ok(Nav::Quit);
                    }
                }
                Ok(CategoryChoice::Back) => return Ok(Nav::Back),
                Err(e) => println!("{e}"),
            }
        }
    }

    async fn choose_quiz(&mut self, index: usize) -> Result<Nav> {
        loop {
            let category = &self.program.categories()[index];
            println!("\nQuizzes:");
            for (i, quiz) in category.quizzes().iter().enumerate() {
                println!("{}. {}", i + 1, quiz.question);
            }
            let count = category.quizzes().len();
            let Some(line) = self
                .input
                .prompt("Type the number of a quiz to try it or 'back' to return: ")
                .await?
            else {
                return Ok(Nav::Quit);
            };

            match parse_selection(&line, count) {
                Ok(Selection::Back) => return Ok(Nav::Back),
                Ok(Selection::Index(quiz)) => {
                    let category = &mut self.program.categories_mut()[index];
                    self.runner
                        .run_single(category, quiz, &mut *self.input, self.reporter)
                        .await?;
                    return Ok(Nav::Back);
                }
                Err(e) => println!("{e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use edulang_core::document::{CategoryDecl, Document, Statement, ValueNode};
    use edulang_core::session::NoopEvents;
    use edulang_runtime::scripted::{RecordingReporter, ReportEvent};

    use super::*;

    fn program() -> Program {
        let document = Document {
            timer: Some(30.0),
            incorrect: Some(3),
            categories: vec![CategoryDecl {
                name: "Geography".into(),
                statements: vec![
                    Statement::Define {
                        term: "capital".into(),
                        definition: ValueNode::literal("seat of government"),
                    },
                    Statement::Quiz {
                        question: "Capital of France?".into(),
                        answers: vec![ValueNode::literal("Paris")],
                    },
                    Statement::Quiz {
                        question: "Capital of Spain?".into(),
                        answers: vec![ValueNode::literal("Madrid")],
                    },
                ],
            }],
            ..Default::default()
        };
        edulang_core::interpret(&document, &SessionCounters::new(), &NoopEvents).unwrap()
    }

    async fn play(input: &'static str, shuffle: bool) -> (Arc<SessionCounters>, RecordingReporter) {
        let mut program = program();
        let config = RunnerConfig {
            shuffle,
            ..RunnerConfig::new(program.settings())
        };
        let counters = Arc::new(SessionCounters::new());
        let runner = QuizRunner::new(config, counters.clone());
        let reporter = RecordingReporter::new();
        let mut input = ConsoleInput::new(input.as_bytes());

        Session {
            program: &mut program,
            runner: &runner,
            input: &mut input,
            reporter: &reporter,
        }
        .run()
        .await
        .unwrap();

        (counters, reporter)
    }

    #[test]
    fn main_menu_choices() {
        assert_eq!("1".parse::<MainChoice>(), Ok(MainChoice::ViewCategories));
        assert_eq!(" 4 ".parse::<MainChoice>(), Ok(MainChoice::Exit));
        assert_eq!(
            "5".parse::<MainChoice>(),
            Err(InvalidMenuChoice::UnknownOption("5".into()))
        );
    }

    #[test]
    fn selections() {
        assert_eq!(parse_selection("2", 3), Ok(Selection::Index(1)));
        assert_eq!(parse_selection("BACK", 3), Ok(Selection::Back));
        assert!(parse_selection("0", 3).is_err());
        assert!(parse_selection("4", 3).is_err());
        assert!(parse_selection("two", 3).is_err());
        assert!(parse_selection("1", 0).is_err());
    }

    #[test]
    fn command_line_beats_config_beats_script() {
        let program = program();
        let config = EdulangConfig {
            shuffle: false,
            seed: Some(1),
            timer_secs: Some(10.0),
            incorrect_limit: Some(5),
        };

        let from_config = runner_config(&program, &config, &Overrides::default());
        assert_eq!(from_config.settings.timer, Some(Duration::from_secs(10)));
        assert_eq!(from_config.settings.incorrect_limit, 5);
        assert_eq!(from_config.seed, Some(1));
        assert!(!from_config.shuffle);

        let overrides = Overrides {
            seed: Some(9),
            timer_secs: Some(0.0),
            incorrect_limit: Some(1),
        };
        let from_cli = runner_config(&program, &config, &overrides);
        assert_eq!(from_cli.settings.timer, None);
        assert_eq!(from_cli.settings.incorrect_limit, 1);
        assert_eq!(from_cli.seed, Some(9));
    }

    #[test]
    fn script_settings_apply_without_overrides() {
        let config = runner_config(&program(), &EdulangConfig::default(), &Overrides::default());
        assert_eq!(config.settings.timer, Some(Duration::from_secs(30)));
        assert_eq!(config.settings.incorrect_limit, 3);
        assert!(config.shuffle);
    }

    #[tokio::test]
    async fn test_all_then_exit() {
        let (counters, reporter) = play("1\n1\n2\nParis\nMadrid\n4\nback\n4\n", false).await;

        let snapshot = counters.snapshot();
        assert_eq!((snapshot.score, snapshot.total_attempts), (2, 2));
        assert_eq!(
            reporter.questions(),
            vec!["Capital of France?", "Capital of Spain?"]
        );
    }

    #[tokio::test]
    async fn choose_one_quiz_and_exit_it() {
        let (counters, reporter) = play("1\n1\n3\n2\nexit\n4\nback\n4\n", true).await;

        assert_eq!(reporter.questions(), vec!["Capital of Spain?"]);
        assert_eq!(counters.snapshot().total_attempts, 0);
    }

    #[tokio::test]
    async fn invalid_choices_reprompt() {
        let (counters, reporter) = play("9\n1\nfoo\n7\n1\n0\n2\nParis\nno\nno\nno\n", false).await;

        assert_eq!(reporter.questions().len(), 2);
        let snapshot = counters.snapshot();
        assert_eq!((snapshot.score, snapshot.total_attempts), (1, 2));
    }

    #[tokio::test]
    async fn reset_score_clears_both_counters() {
        let (counters, _) = play("1\n1\n3\n1\nParis\n4\nback\n3\n4\n", false).await;
        assert_eq!(counters.snapshot().total_attempts, 0);
        assert_eq!(counters.snapshot().score, 0);
    }

    #[tokio::test]
    async fn closed_input_leaves_every_menu() {
        let (counters, reporter) = play("1\n1\n2\nParis\n", false).await;

        assert_eq!(reporter.questions().len(), 2);
        assert_eq!(reporter.events().last(), Some(&ReportEvent::Exit));
        assert_eq!(counters.snapshot().total_attempts, 1);
    }
}
