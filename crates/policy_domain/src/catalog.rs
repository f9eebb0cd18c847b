use std::collections::HashSet;
use std::path::Path;

use crate::{CatalogError, TestCase};

/// Validated, id-ordered collection of test cases. Built once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    cases: Vec<TestCase>,
}

impl Catalog {
    /// Validates the cases, lowercases their keywords and orders them by id.
    pub fn new(mut cases: Vec<TestCase>) -> Result<Self, CatalogError> {
        if cases.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(cases.len());
        for case in cases.iter_mut() {
            if case.id == 0 {
                return Err(CatalogError::InvalidId(case.id));
            }
            if !seen.insert(case.id) {
                return Err(CatalogError::DuplicateId(case.id));
            }
            if case.question.trim().is_empty() {
                return Err(CatalogError::EmptyQuestion(case.id));
            }
            if case
                .required_keywords
                .iter()
                .chain(&case.forbidden_keywords)
                .any(|keyword| keyword.trim().is_empty())
            {
                return Err(CatalogError::EmptyKeyword(case.id));
            }
            case.normalize_keywords();
        }

        cases.sort_by_key(|case| case.id);
        Ok(Self { cases })
    }

    /// Parses a JSON array of test cases.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cases: Vec<TestCase> = serde_json::from_str(json)?;
        Self::new(cases)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.iter()
    }

    pub fn get(&self, id: u32) -> Option<&TestCase> {
        self.cases
            .binary_search_by_key(&id, |case| case.id)
            .ok()
            .map(|index| &self.cases[index])
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
