use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CMS configuration: {0}")]
    Config(String),
}

impl CmsError {
    /// Transport failures and 5xx answers may go away on their own.
    pub(crate) fn should_retry(&self) -> bool {
        match self {
            CmsError::Http { source, .. } => source.is_timeout() || source.is_connect(),
            CmsError::Status { status, .. } => status.is_server_error(),
            CmsError::Decode { .. } | CmsError::Config(_) => false,
        }
    }
}

pub type CmsResult<T> = Result<T, CmsError>;
