use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// A fixed question together with the keywords its answer must and must not
/// contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct TestCase {
    /// Positive, unique id. Cases are always evaluated in ascending id order.
    pub id: u32,
    /// Sent verbatim to the answer source.
    pub question: String,
    /// Lowercase keywords that must all appear in the answer for a PASS.
    #[serde(default, alias = "expected_keywords")]
    pub required_keywords: Vec<String>,
    /// Lowercase keywords whose presence fails the case outright.
    #[serde(default, alias = "expected_not")]
    pub forbidden_keywords: Vec<String>,
    /// Human-readable description of a good answer. Reporting only.
    #[serde(default)]
    pub expected_summary: String,
}

impl TestCase {
    pub fn new(id: u32, question: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            required_keywords: Vec::new(),
            forbidden_keywords: Vec::new(),
            expected_summary: String::new(),
        }
    }

    /// Lowercases every keyword in place. Declared order and duplicates are
    /// left untouched.
    pub(crate) fn normalize_keywords(&mut self) {
        for keyword in self
            .required_keywords
            .iter_mut()
            .chain(self.forbidden_keywords.iter_mut())
        {
            *keyword = keyword.to_lowercase();
        }
    }
}
