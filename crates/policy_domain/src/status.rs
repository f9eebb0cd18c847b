use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Verdict assigned to a single test case. A case starts out pending and
/// receives exactly one of these once it has been evaluated.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Partial,
    Fail,
    Error,
}

impl Status {
    /// Whether this verdict is tallied as a failure in the run summary.
    /// `Error` stays a distinct status per case but counts as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Fail | Status::Error)
    }
}
