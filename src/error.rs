use thiserror::Error;

/// Failure of a single remote read.
///
/// These never escape [`crate::fetcher::ActivitySummaryFetcher::fetch`]; the
/// fetcher turns each one into the default value for the affected metric.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected payload from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl FetchError {
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        FetchError::Malformed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
