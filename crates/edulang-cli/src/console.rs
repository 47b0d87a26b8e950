//! Terminal input and output for an interactive session.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};

use edulang_core::session::{ScoreSnapshot, SessionEvents};
use edulang_runtime::{AnswerSource, QuizReporter};

const ANSWER_PROMPT: &str = "Your Answer (or type 'hint' or 'EXIT' to return to menu): ";

/// Line-oriented input shared by the menus and the quiz runner.
///
/// Menus and answers must read through the same buffer, otherwise lines typed
/// ahead would be lost between the two.
pub struct ConsoleInput<R = Stdin> {
    lines: Lines<BufReader<R>>,
}

impl ConsoleInput<Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin + Send> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Print `prompt` and read one line. `None` once input is closed.
    pub async fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print_prompt(prompt);
        self.lines.next_line().await
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> AnswerSource for ConsoleInput<R> {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.prompt(ANSWER_PROMPT).await
    }
}

fn print_prompt(prompt: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{prompt}");
    let _ = stdout.flush();
}

/// Prints quiz progress to stdout.
pub struct ConsoleReporter;

impl QuizReporter for ConsoleReporter {
    fn on_question(&self, question: &str) {
        println!("\nQuiz: {question}");
    }

    fn on_hint(&self, hint: &str) {
        println!("Hint: {hint}");
    }

    fn on_no_hints(&self) {
        println!("No more hints available.");
    }

    fn on_incorrect(&self, attempts_left: u32) {
        println!("Incorrect. {attempts_left} attempts left.");
    }

    fn on_correct(&self) {
        println!("Correct!");
    }

    fn on_answers_revealed(&self, answers: &[String]) {
        println!("The correct answer(s) are: {}", answers.join(", "));
    }

    fn on_timed_out(&self, answers: &[String]) {
        println!("\nTime's up!");
        self.on_answers_revealed(answers);
    }

    fn on_exit(&self) {
        println!("Returning to the menu...");
    }
}

/// Prints what a script's top-level session commands report while loading.
pub struct ConsoleEvents;

impl SessionEvents for ConsoleEvents {
    fn on_show_score(&self, snapshot: ScoreSnapshot) {
        println!("Your current score is: {}", snapshot.score);
    }

    fn on_score_reset(&self) {
        println!("Score has been reset.");
    }
}
