use std::sync::Arc;
use std::time::Duration;

use derive_setters::Setters;
use policy_domain::{AnswerSource, Catalog, EvaluationResult, RunReport, TestCase};
use tracing::{debug, info, warn};

use crate::Grader;

#[derive(Debug, Clone, Default, Setters)]
#[setters(into)]
pub struct RunOptions {
    /// Minimum pause between two consecutive calls to the answer source.
    /// Zero for in-process sources, non-zero for rate-limited services.
    pub call_delay: Duration,
    pub grader: Grader,
}

/// Runs a catalog against an answer source, one case at a time in id order.
///
/// Each case gets exactly one call to the source. A failed call becomes an
/// `Error` verdict for that case and the run moves on.
pub struct VerdictEngine {
    source: Arc<dyn AnswerSource>,
    options: RunOptions,
}

impl VerdictEngine {
    pub fn new(source: Arc<dyn AnswerSource>, options: RunOptions) -> Self {
        Self { source, options }
    }

    pub async fn run_all(&self, catalog: &Catalog) -> RunReport {
        self.run_all_with(catalog, |_, _| {}).await
    }

    /// Like [`VerdictEngine::run_all`], calling `on_result` as soon as each
    /// case has its verdict.
    pub async fn run_all_with<F>(&self, catalog: &Catalog, mut on_result: F) -> RunReport
    where
        F: FnMut(&TestCase, &EvaluationResult),
    {
        let mut report = RunReport::default();

        for (index, case) in catalog.iter().enumerate() {
            if index > 0 && !self.options.call_delay.is_zero() {
                tokio::time::sleep(self.options.call_delay).await;
            }

            let result = self.run_case(case).await;
            on_result(case, &result);
            report.push(result);
        }

        info!(
            pass = report.summary.pass,
            partial = report.summary.partial,
            fail = report.summary.fail,
            "Run finished"
        );
        report
    }

    async fn run_case(&self, case: &TestCase) -> EvaluationResult {
        debug!(id = case.id, question = %case.question, "Evaluating case");

        match self.source.answer(&case.question, &[]).await {
            Ok(answer) => {
                let result = self.options.grader.evaluate(case, &answer);
                info!(id = case.id, status = %result.status, "Case evaluated");
                result
            }
            Err(error) => {
                warn!(id = case.id, error = %format!("{error:#}"), "Failed to obtain answer");
                self.options.grader.evaluate_fault(case, &error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use policy_domain::{ChatMessage, Status, Summary};
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;

    /// Answers from a fixed table and records when it was asked.
    struct ScriptedSource {
        answers: HashMap<String, anyhow::Result<String>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedSource {
        fn new(answers: Vec<(&str, anyhow::Result<String>)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(question, answer)| (question.to_string(), answer))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn questions(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(question, _)| question.clone())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl AnswerSource for ScriptedSource {
        async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String> {
            assert!(history.is_empty());
            self.calls
                .lock()
                .unwrap()
                .push((question.to_string(), Instant::now()));
            match self.answers.get(question) {
                Some(Ok(answer)) => Ok(answer.clone()),
                Some(Err(error)) => Err(anyhow::anyhow!("{error}")),
                None => anyhow::bail!("no scripted answer"),
            }
        }
    }

    fn case(id: u32, question: &str, required: &[&str]) -> TestCase {
        TestCase::new(id, question)
            .required_keywords(required.iter().map(|k| k.to_string()).collect::<Vec<_>>())
    }

    fn fixture_catalog() -> Catalog {
        Catalog::new(vec![
            case(3, "third", &["c"]),
            case(1, "first", &["a"]),
            case(2, "second", &["x"]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_all_evaluates_in_id_order_with_fault_isolation() {
        let source = Arc::new(ScriptedSource::new(vec![
            ("first", Ok("a".to_string())),
            ("second", Err(anyhow::anyhow!("503 Service Unavailable"))),
            ("third", Ok("nothing".to_string())),
        ]));
        let engine = VerdictEngine::new(source.clone(), RunOptions::default());

        let actual = engine.run_all(&fixture_catalog()).await;

        let statuses: Vec<(u32, Status)> = actual
            .results
            .iter()
            .map(|result| (result.case_id, result.status))
            .collect();
        assert_eq!(
            statuses,
            vec![(1, Status::Pass), (2, Status::Error), (3, Status::Fail)]
        );
        assert_eq!(actual.summary, Summary { pass: 1, partial: 0, fail: 2 });
        assert_eq!(
            actual.results[1].error.as_deref(),
            Some("503 Service Unavailable")
        );
        assert_eq!(source.questions(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_run_all_with_reports_each_result() {
        let source = Arc::new(ScriptedSource::new(vec![
            ("first", Ok("a".to_string())),
            ("third", Ok("c".to_string())),
        ]));
        let engine = VerdictEngine::new(source, RunOptions::default());
        let mut seen = Vec::new();

        let report = engine
            .run_all_with(&fixture_catalog(), |case, result| {
                seen.push((case.id, result.status));
            })
            .await;

        assert_eq!(
            seen,
            vec![(1, Status::Pass), (2, Status::Error), (3, Status::Pass)]
        );
        assert_eq!(report.results.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_delay_is_applied_between_cases() {
        let source = Arc::new(ScriptedSource::new(vec![
            ("first", Ok("a".to_string())),
            ("second", Ok("x".to_string())),
            ("third", Ok("c".to_string())),
        ]));
        let options = RunOptions::default().call_delay(Duration::from_secs(1));
        let engine = VerdictEngine::new(source.clone(), options);
        let start = Instant::now();

        engine.run_all(&fixture_catalog()).await;

        let offsets: Vec<Duration> = source
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| at.duration_since(start))
            .collect();
        assert_eq!(
            offsets,
            vec![
                Duration::from_secs(0),
                Duration::from_secs(1),
                Duration::from_secs(2)
            ]
        );
    }

    #[tokio::test]
    async fn test_run_all_uses_configured_grader() {
        let catalog = Catalog::new(vec![case(1, "first", &["a", "b", "c", "d"])]).unwrap();
        let source = Arc::new(ScriptedSource::new(vec![("first", Ok("a b".to_string()))]));
        let grader = Grader::default().partial_threshold(0.75).preview_chars(1usize);
        let options = RunOptions::default().grader(grader);
        let engine = VerdictEngine::new(source, options);

        let actual = engine.run_all(&catalog).await;

        assert_eq!(actual.results[0].status, Status::Fail);
        assert_eq!(actual.results[0].answer_preview, "a");
    }
}
