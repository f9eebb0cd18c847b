use derive_setters::Setters;
use policy_domain::{EvaluationResult, Status, TestCase};

/// Turns an answer into a verdict for a test case.
///
/// Matching is case-insensitive, unanchored substring containment: a keyword
/// counts as present if it occurs anywhere in the lowercased answer, so
/// `"60%"` also matches inside `"160%"`.
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct Grader {
    /// Minimum fraction of required keywords that must be found for a
    /// `Partial` verdict when some are missing.
    pub partial_threshold: f64,
    /// Number of characters of the lowercased answer kept for auditing.
    pub preview_chars: usize,
}

impl Default for Grader {
    fn default() -> Self {
        Self { partial_threshold: 0.5, preview_chars: 200 }
    }
}

impl Grader {
    /// Grades an answer.
    ///
    /// Any forbidden keyword fails the case regardless of the required ones.
    /// Otherwise all required keywords present is a pass, at least
    /// `partial_threshold` of them present is partial, anything less fails.
    /// An empty required set passes unless a forbidden keyword is hit.
    pub fn evaluate(&self, case: &TestCase, answer: &str) -> EvaluationResult {
        let answer = answer.to_lowercase();
        let preview = answer.chars().take(self.preview_chars).collect();

        let forbidden_found = matching(&case.forbidden_keywords, &answer, true);
        if !forbidden_found.is_empty() {
            return EvaluationResult::graded(
                case,
                Status::Fail,
                Vec::new(),
                forbidden_found,
                preview,
            );
        }

        let missing_keywords = matching(&case.required_keywords, &answer, false);
        let total = case.required_keywords.len();
        let found = total - missing_keywords.len();

        let status = if missing_keywords.is_empty() {
            Status::Pass
        } else if found as f64 >= total as f64 * self.partial_threshold {
            Status::Partial
        } else {
            Status::Fail
        };

        EvaluationResult::graded(case, status, missing_keywords, forbidden_found, preview)
    }

    /// Records a case whose answer could not be obtained. No keyword matching
    /// happens.
    pub fn evaluate_fault(&self, case: &TestCase, error: &anyhow::Error) -> EvaluationResult {
        EvaluationResult::errored(case, format!("{error:#}"))
    }
}

/// Grades with the default threshold and preview length.
pub fn evaluate(case: &TestCase, answer: &str) -> EvaluationResult {
    Grader::default().evaluate(case, answer)
}

/// Keywords whose presence in `answer` equals `present`, in declared order.
fn matching(keywords: &[String], answer: &str, present: bool) -> Vec<String> {
    keywords
        .iter()
        .filter(|keyword| answer.contains(keyword.to_lowercase().as_str()) == present)
        .cloned()
        .collect()
}
