//! Running a whole category, or one chosen quiz from it.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use edulang_core::program::Category;
use edulang_core::session::Outcome;

use crate::quiz::QuizRunner;
use crate::traits::{AnswerSource, QuizReporter};

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every quiz in the category was asked.
    Completed,
    /// The user exited on one of the questions.
    ExitedEarly,
}

/// Per-question results of a batch run, in the order asked.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub outcome: BatchOutcome,
    pub results: Vec<(String, Outcome)>,
}

impl BatchSummary {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// A uniformly shuffled order of `0..len`.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

impl QuizRunner {
    /// Ask every quiz in the category, in a fresh random order each call
    /// (declaration order when shuffling is off). Stops at the first exit.
    pub async fn run_category(
        &self,
        category: &mut Category,
        input: &mut dyn AnswerSource,
        reporter: &dyn QuizReporter,
    ) -> Result<BatchSummary> {
        let len = category.quizzes().len();
        let order = if self.config().shuffle {
            self.shuffle_order(len)
        } else {
            (0..len).collect()
        };
        self.run_in_order(category, &order, input, reporter).await
    }

    /// Like [`run_category`](Self::run_category), always shuffling with the given RNG.
    pub async fn run_category_with_rng<R: Rng + ?Sized>(
        &self,
        category: &mut Category,
        rng: &mut R,
        input: &mut dyn AnswerSource,
        reporter: &dyn QuizReporter,
    ) -> Result<BatchSummary> {
        let order = shuffled_order(category.quizzes().len(), rng);
        self.run_in_order(category, &order, input, reporter).await
    }

    /// Ask the quizzes at the given indices, in that order. Stops at the first exit.
    pub async fn run_in_order(
        &self,
        category: &mut Category,
        order: &[usize],
        input: &mut dyn AnswerSource,
        reporter: &dyn QuizReporter,
    ) -> Result<BatchSummary> {
        let mut results = Vec::with_capacity(order.len());
        let mut outcome = BatchOutcome::Completed;

        for &index in order {
            let Some((quiz, hints)) = category.quiz_and_hints_mut(index) else {
                continue;
            };
            let settled = self.ask(quiz, hints, input, reporter).await?;
            results.push((quiz.question.clone(), settled));
            if settled.ends_batch() {
                outcome = BatchOutcome::ExitedEarly;
                break;
            }
        }

        tracing::info!(
            category = %category.name,
            asked = results.len(),
            ?outcome,
            "batch finished"
        );

        Ok(BatchSummary { outcome, results })
    }

    /// Ask one quiz, chosen by its zero-based position in the category.
    pub async fn run_single(
        &self,
        category: &mut Category,
        index: usize,
        input: &mut dyn AnswerSource,
        reporter: &dyn QuizReporter,
    ) -> Result<Outcome> {
        let name = category.name.clone();
        let (quiz, hints) = category
            .quiz_and_hints_mut(index)
            .ok_or_else(|| anyhow::anyhow!("category '{name}' has no quiz #{}", index + 1))?;
        self.ask(quiz, hints, input, reporter).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use edulang_core::program::{Quiz, QuizSettings};
    use edulang_core::session::SessionCounters;

    use super::*;
    use crate::quiz::RunnerConfig;
    use crate::scripted::{RecordingReporter, ReportEvent, ScriptedAnswers};
    use crate::NoopReporter;

    fn category(n: usize) -> Category {
        let mut category = Category::new("Numbers");
        for i in 0..n {
            category.add_quiz(Quiz::new(format!("Q{i}"), vec!["ok".into()]));
        }
        category
    }

    fn runner(shuffle: bool, seed: Option<u64>) -> QuizRunner {
        let config = RunnerConfig {
            settings: QuizSettings::default(),
            shuffle,
            seed,
        };
        QuizRunner::new(config, Arc::new(SessionCounters::new()))
    }

    #[test]
    fn shuffled_order_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut order = shuffled_order(10, &mut rng);
        order.sort_unstable();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn runs_every_quiz_once() {
        let runner = runner(true, Some(42));
        let mut category = category(5);
        let reporter = RecordingReporter::new();
        let mut input = ScriptedAnswers::new(vec!["ok"; 5]);

        let summary = runner
            .run_category(&mut category, &mut input, &reporter)
            .await
            .unwrap();

        assert_eq!(summary.outcome, BatchOutcome::Completed);
        assert_eq!(summary.count(Outcome::Correct), 5);
        let mut asked = reporter.questions();
        asked.sort();
        assert_eq!(asked, vec!["Q0", "Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(runner.counters().snapshot().score, 5);
    }

    #[tokio::test]
    async fn shuffling_leaves_declaration_order_alone() {
        let runner = runner(true, Some(3));
        let mut category = category(6);
        let mut input = ScriptedAnswers::new(vec!["ok"; 6]);

        runner
            .run_category(&mut category, &mut input, &NoopReporter)
            .await
            .unwrap();

        let declared: Vec<_> = category.quizzes().iter().map(|q| q.question.as_str()).collect();
        assert_eq!(declared, vec!["Q0", "Q1", "Q2", "Q3", "Q4", "Q5"]);
    }

    #[tokio::test]
    async fn same_seed_same_order() {
        let mut orders = Vec::new();
        for _ in 0..2 {
            let runner = runner(true, Some(99));
            let mut category = category(8);
            let reporter = RecordingReporter::new();
            let mut input = ScriptedAnswers::new(vec!["ok"; 8]);
            runner
                .run_category(&mut category, &mut input, &reporter)
                .await
                .unwrap();
            orders.push(reporter.questions());
        }
        assert_eq!(orders[0], orders[1]);
    }

    #[tokio::test]
    async fn explicit_rng_matches_shuffled_order() {
        let runner = runner(false, None);
        let mut category = category(6);
        let reporter = RecordingReporter::new();
        let mut input = ScriptedAnswers::new(vec!["ok"; 6]);

        let mut rng = StdRng::seed_from_u64(11);
        runner
            .run_category_with_rng(&mut category, &mut rng, &mut input, &reporter)
            .await
            .unwrap();

        let expected: Vec<String> = shuffled_order(6, &mut StdRng::seed_from_u64(11))
            .into_iter()
            .map(|i| format!("Q{i}"))
            .collect();
        assert_eq!(reporter.questions(), expected);
    }

    #[tokio::test]
    async fn without_shuffle_runs_in_declaration_order() {
        let runner = runner(false, None);
        let mut category = category(3);
        let reporter = RecordingReporter::new();
        let mut input = ScriptedAnswers::new(["ok", "ok", "ok"]);

        runner
            .run_category(&mut category, &mut input, &reporter)
            .await
            .unwrap();

        assert_eq!(reporter.questions(), vec!["Q0", "Q1", "Q2"]);
    }

    #[tokio::test]
    async fn exit_stops_the_batch() {
        let runner = runner(false, None);
        let mut category = category(3);
        let mut input = ScriptedAnswers::new(["ok", "EXIT", "ok"]);

        let summary = runner
            .run_category(&mut category, &mut input, &NoopReporter)
            .await
            .unwrap();

        assert_eq!(summary.outcome, BatchOutcome::ExitedEarly);
        assert_eq!(
            summary.results,
            vec![
                ("Q0".to_string(), Outcome::Correct),
                ("Q1".to_string(), Outcome::ExplicitExit),
            ]
        );
        assert_eq!(input.remaining(), 1);
        let snapshot = runner.counters().snapshot();
        assert_eq!((snapshot.score, snapshot.total_attempts), (1, 1));
    }

    #[tokio::test]
    async fn single_quiz_hints_persist_between_runs() {
        let runner = runner(false, None);
        let mut category = category(2);
        category.add_hint("Q1", "only hint");

        let reporter = RecordingReporter::new();
        let mut input = ScriptedAnswers::new(["hint", "exit", "hint", "ok"]);
        let first = runner
            .run_single(&mut category, 1, &mut input, &reporter)
            .await
            .unwrap();
        let second = runner
            .run_single(&mut category, 1, &mut input, &reporter)
            .await
            .unwrap();

        assert_eq!(first, Outcome::ExplicitExit);
        assert_eq!(second, Outcome::Correct);
        assert_eq!(category.hints_for("Q1").map(|h| h.len()), Some(0));
        let events = reporter.events();
        assert!(events.contains(&ReportEvent::Hint("only hint".into())));
        assert!(events.contains(&ReportEvent::NoHints));
    }

    #[tokio::test]
    async fn single_quiz_out_of_range() {
        let runner = runner(false, None);
        let mut category = category(1);
        let mut input = ScriptedAnswers::new(["ok"]);

        let err = runner
            .run_single(&mut category, 4, &mut input, &NoopReporter)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no quiz #5"));
    }
}
