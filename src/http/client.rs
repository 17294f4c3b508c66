use reqwest::Client;
use tracing::{debug, error};

use crate::args::DEFAULT_USER_AGENT;
use crate::config::RunConfig;
use crate::error::HttpError;

/// Builds the shared client. Connections are pooled and kept alive; the idle
/// pool is sized to the concurrency factor so every in-flight slot can reuse
/// a connection.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(config: &RunConfig) -> Result<Client, HttpError> {
    let mut builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .pool_max_idle_per_host(config.concurrency.get());

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if config.http2 {
        debug!("Using HTTP/2 with prior knowledge");
        builder = builder.http2_prior_knowledge();
    }

    builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        HttpError::BuildClientFailed { source: err }
    })
}
