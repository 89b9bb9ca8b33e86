use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Failed to parse {provider} response: {message}")]
    JsonParse { provider: String, message: String },

    #[error("{provider} search is not configured")]
    NotConfigured { provider: String },

    #[error("{provider} API error: {message}")]
    RemoteApi { provider: String, message: String },

    #[error("Rate limited by {provider}, retry after {retry_after_seconds}s")]
    RateLimited {
        provider: String,
        retry_after_seconds: u64,
    },
}

impl MetadataError {
    pub(crate) fn parse(provider: &str, error: impl std::fmt::Display) -> Self {
        Self::JsonParse {
            provider: provider.to_string(),
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
