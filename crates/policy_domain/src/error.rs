use std::path::PathBuf;

/// Problems with a test catalog. These are configuration faults: a run never
/// starts with an invalid catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Test case ids must be positive, found {0}")]
    InvalidId(u32),

    #[error("Duplicate test case id {0}")]
    DuplicateId(u32),

    #[error("Test case {0} has an empty question")]
    EmptyQuestion(u32),

    #[error("Test case {0} has a blank keyword")]
    EmptyKeyword(u32),

    #[error("Catalog has no test cases")]
    Empty,

    #[error("Failed to parse catalog")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read catalog {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
