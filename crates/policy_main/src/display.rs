use std::fmt::Display;

use colored::{ColoredString, Colorize};
use policy_domain::{EvaluationResult, Status, Summary, TestCase};

const RULE_WIDTH: usize = 70;
const QUESTION_WIDTH: usize = 65;

/// Console rendering of a validation run. Rendering functions return plain
/// text; only [`Progress::print_result`] adds color.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self { total }
    }

    pub fn header(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        format!("\n{rule}\n  HR POLICY VALIDATION: {} questions\n{rule}\n", self.total)
    }

    pub fn case_line(&self, case: &TestCase) -> String {
        let question: String = case.question.chars().take(QUESTION_WIDTH).collect();
        format!("  [{:2}/{}] {question}...", case.id, self.total)
    }

    pub fn verdict_line(&self, result: &EvaluationResult) -> String {
        verdict(result.status, result)
    }

    pub fn summary(&self, summary: &Summary) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let total = summary.total();
        let score = summary.score_percent();
        [
            format!("\n{rule}"),
            "  RESULTS SUMMARY".to_string(),
            rule.clone(),
            format!("  PASS:    {:2} / {total}", summary.pass),
            format!("  PARTIAL: {:2} / {total}", summary.partial),
            format!("  FAIL:    {:2} / {total}", summary.fail),
            format!("  Score:   {}/{total} ({score}%)", summary.pass),
            format!("{rule}\n"),
        ]
        .join("\n")
    }

    pub fn print_header(&self) {
        println!("{}", self.header());
    }

    pub fn print_result(&self, case: &TestCase, result: &EvaluationResult) {
        println!("{}", self.case_line(case));
        println!("         {}", verdict(paint(result.status), result));
    }

    pub fn print_summary(&self, summary: &Summary) {
        println!("{}", self.summary(summary));
    }
}

fn verdict(label: impl Display, result: &EvaluationResult) -> String {
    match result.reason() {
        Some(reason) => format!("{label} {reason}"),
        None => label.to_string(),
    }
}

fn paint(status: Status) -> ColoredString {
    let label = status.to_string();
    match status {
        Status::Pass => label.green().bold(),
        Status::Partial => label.yellow().bold(),
        Status::Fail => label.red().bold(),
        Status::Error => label.red().bold().reversed(),
    }
}
