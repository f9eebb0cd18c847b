/// Ways an answer source can fail to produce an answer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("Response from {url} has no `{field}`")]
    MissingField { url: String, field: &'static str },
}

impl Error {
    /// Transport failures and the listed status codes are worth another
    /// attempt. A malformed body will not get better by asking again.
    pub fn is_retryable(&self, retry_status_codes: &[u16]) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Status { status, .. } => retry_status_codes.contains(status),
            Error::Malformed { .. } | Error::MissingField { .. } => false,
        }
    }
}
