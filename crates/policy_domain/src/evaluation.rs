use serde::{Deserialize, Serialize};

use crate::{Status, TestCase};

/// Outcome of evaluating one test case. Field names match the persisted
/// report format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "id")]
    pub case_id: u32,
    pub question: String,
    pub status: Status,
    #[serde(rename = "expected")]
    pub expected_summary: String,
    /// Required keywords absent from the answer, in catalog order.
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    /// Forbidden keywords present in the answer, in catalog order.
    #[serde(default)]
    pub forbidden_found: Vec<String>,
    /// Lowercased prefix of the answer, for auditing.
    #[serde(default)]
    pub answer_preview: String,
    /// Set only when `status` is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationResult {
    /// Result for a case whose answer was obtained and checked.
    pub fn graded(
        case: &TestCase,
        status: Status,
        missing_keywords: Vec<String>,
        forbidden_found: Vec<String>,
        answer_preview: String,
    ) -> Self {
        Self {
            case_id: case.id,
            question: case.question.clone(),
            status,
            expected_summary: case.expected_summary.clone(),
            missing_keywords,
            forbidden_found,
            answer_preview,
            error: None,
        }
    }

    /// Result for a case whose answer could not be obtained.
    pub fn errored(case: &TestCase, error: impl Into<String>) -> Self {
        Self {
            case_id: case.id,
            question: case.question.clone(),
            status: Status::Error,
            expected_summary: case.expected_summary.clone(),
            missing_keywords: Vec::new(),
            forbidden_found: Vec::new(),
            answer_preview: String::new(),
            error: Some(error.into()),
        }
    }

    /// Short human-readable explanation of a non-passing verdict.
    pub fn reason(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if !self.forbidden_found.is_empty() {
            return Some(format!("Contains forbidden: {:?}", self.forbidden_found));
        }
        if !self.missing_keywords.is_empty() {
            return Some(format!("Missing: {:?}", self.missing_keywords));
        }
        None
    }
}
