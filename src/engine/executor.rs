use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

use crate::config::RunConfig;
use crate::http::{Transport, TransportRequest};
use crate::output::{OutputEvent, OutputSink};

use super::admission::Permit;
use super::drain::DrainTracker;

/// Everything a request cycle reads. Shared by all cycles of a run and never
/// mutated after construction.
pub struct CycleContext {
    pub config: Arc<RunConfig>,
    pub transport: Arc<dyn Transport>,
    pub sink: OutputSink,
    pub drains: DrainTracker,
}

impl CycleContext {
    #[must_use]
    pub fn new(
        config: Arc<RunConfig>,
        transport: Arc<dyn Transport>,
        sink: OutputSink,
        drains: DrainTracker,
    ) -> Self {
        Self {
            config,
            transport,
            sink,
            drains,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Expected(u16),
    Unexpected(u16),
    Failed,
}

/// Runs one request cycle while holding `permit`.
///
/// Transport failures and unexpected statuses are reported through the sink
/// and never returned as errors. The body is drained on a detached task, so
/// the permit is released as soon as the status is known and the configured
/// delay has passed.
pub async fn execute_cycle(ctx: &CycleContext, target: Url, permit: Permit) -> CycleOutcome {
    let request = TransportRequest {
        url: target,
        headers: ctx.config.request_headers(),
    };
    let url_text = request.url.to_string();

    let response = match ctx.transport.send(request).await {
        Ok(response) => response,
        Err(err) => {
            debug!(timeout = err.is_timeout(), "Request failed: {}", err);
            ctx.sink
                .emit(OutputEvent::TransportFailure {
                    message: err.to_string(),
                })
                .await;
            drop(permit);
            return CycleOutcome::Failed;
        }
    };

    let status = response.status;
    let outcome = if ctx.config.expected_status.contains(status) {
        trace!(status, url = %url_text, "Received expected response");
        CycleOutcome::Expected(status)
    } else {
        ctx.sink
            .emit(OutputEvent::UnexpectedStatus {
                status,
                url: url_text.clone(),
            })
            .await;
        CycleOutcome::Unexpected(status)
    };

    drop(ctx.drains.spawn(url_text, response.body));

    if !ctx.config.delay.is_zero() {
        tokio::time::sleep(ctx.config.delay).await;
    }

    drop(permit);
    outcome
}
