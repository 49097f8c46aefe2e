//! CMS error taxonomy

/// Errors raised while talking to the CMS query API
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error {0} (url: {1})")]
    Status(reqwest::StatusCode, url::Url),

    #[error("repository publishes no master ref")]
    MissingMasterRef,

    #[error("document not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CmsError>;
