use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::AdmissionError;
use crate::output::OutputEvent;
use crate::shutdown::ShutdownReceiver;
use crate::stats::{StatsSnapshot, report_stats};

use super::admission::AdmissionController;
use super::executor::{CycleContext, execute_cycle};

/// Upper bound on waiting for detached body drains once a bounded run stops.
pub const DRAIN_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The permit pool refused a permit; in-flight cycles are not awaited.
    AdmissionFailed(AdmissionError),
    /// The configured request budget was dispatched.
    BudgetExhausted,
    /// The shutdown signal fired.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: u64,
    pub reason: StopReason,
}

/// Drives the run: acquire a permit, launch a cycle for the next target in
/// round-robin order, launch a stats report, repeat.
///
/// Neither the cycle nor the report is awaited; the only backpressure is the
/// permit pool. Without a request budget or shutdown signal the loop ends only
/// when admission fails. Bounded runs wait for outstanding cycles and, up to
/// [`DRAIN_GRACE_PERIOD`], for their body drains before returning.
pub async fn run_dispatch_loop(
    ctx: Arc<CycleContext>,
    admission: &AdmissionController,
    mut shutdown_rx: Option<ShutdownReceiver>,
) -> DispatchSummary {
    let start = Instant::now();
    let budget = ctx.config.max_requests.map(|limit| limit.get());
    let mut iteration: u64 = 0;

    let reason = loop {
        if budget.is_some_and(|limit| iteration >= limit) {
            break StopReason::BudgetExhausted;
        }

        let acquired = tokio::select! {
            biased;
            () = shutdown_signal(shutdown_rx.as_mut()) => None,
            permit = admission.acquire() => Some(permit),
        };
        let permit = match acquired {
            None => break StopReason::Shutdown,
            Some(Ok(permit)) => permit,
            Some(Err(err)) => {
                error!("Failed to acquire permit: {}", err);
                ctx.sink
                    .emit(OutputEvent::Stopped {
                        message: format!("Failed to acquire permit: {}", err),
                    })
                    .await;
                break StopReason::AdmissionFailed(err);
            }
        };

        let target = ctx.config.targets.select(iteration).clone();
        let cycle_ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            execute_cycle(&cycle_ctx, target, permit).await;
        });

        let sink = ctx.sink.clone();
        tokio::spawn(async move {
            report_stats(&sink, iteration, start);
        });

        iteration = iteration.saturating_add(1);
    };

    debug!(dispatched = iteration, ?reason, "Dispatch loop stopped");

    if !matches!(reason, StopReason::AdmissionFailed(_)) {
        settle(&ctx, admission).await;
        ctx.sink
            .emit(OutputEvent::Progress(StatsSnapshot::capture(iteration, start)))
            .await;
    }

    DispatchSummary {
        dispatched: iteration,
        reason,
    }
}

/// Waits for every permit to come back, then for body drains.
async fn settle(ctx: &CycleContext, admission: &AdmissionController) {
    if let Err(err) = admission.wait_idle().await {
        warn!("Could not wait for in-flight requests: {}", err);
        return;
    }
    if tokio::time::timeout(DRAIN_GRACE_PERIOD, ctx.drains.wait_idle())
        .await
        .is_err()
    {
        warn!(
            pending = ctx.drains.pending(),
            "Gave up waiting for response bodies to drain"
        );
    }
}

async fn shutdown_signal(shutdown_rx: Option<&mut ShutdownReceiver>) {
    match shutdown_rx {
        Some(shutdown_rx) => {
            drop(shutdown_rx.recv().await);
        }
        None => std::future::pending::<()>().await,
    }
}
