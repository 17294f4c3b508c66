use async_trait::async_trait;
use futures_util::{StreamExt, stream::BoxStream};
use reqwest::{Client, header::HeaderMap};
use url::Url;

use crate::config::RunConfig;
use crate::error::{HttpError, TransportError};

use super::client::build_client;

/// Response body as a stream of chunk sizes. Consuming it to the end releases
/// the underlying connection back to the pool.
pub type BodyStream = BoxStream<'static, Result<u64, TransportError>>;

/// A GET request for one target with its own copy of the headers.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

pub struct TransportResponse {
    pub status: u16,
    pub body: BodyStream,
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Sends a single request. Implementations are shared across every
/// concurrent request cycle.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the request cannot be built or no response
    /// is received.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &RunConfig) -> Result<Self, HttpError> {
        Ok(Self::new(build_client(config)?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let TransportRequest { url, headers } = request;
        let url_text = url.to_string();

        let built = self
            .client
            .get(url)
            .headers(headers)
            .build()
            .map_err(|err| TransportError::BuildRequest {
                url: url_text.clone(),
                source: err,
            })?;

        let response =
            self.client
                .execute(built)
                .await
                .map_err(|err| TransportError::Send {
                    url: url_text.clone(),
                    source: err,
                })?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => Ok(u64::try_from(bytes.len()).unwrap_or(u64::MAX)),
                Err(err) => Err(TransportError::Body {
                    url: url_text.clone(),
                    source: err,
                }),
            })
            .boxed();

        Ok(TransportResponse { status, body })
    }
}
