use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Failure of a single request cycle before or while receiving a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build request for {url}: {source}")]
    BuildRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Get \"{url}\": {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::BuildRequest { source, .. }
            | TransportError::Send { source, .. }
            | TransportError::Body { source, .. } => source.is_timeout(),
            TransportError::Other(_) => false,
        }
    }
}
