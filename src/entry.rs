use std::sync::Arc;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{debug, info};

use crate::args::{HammerArgs, default_concurrency};
use crate::config::RunConfig;
use crate::engine::{
    AdmissionController, CycleContext, DrainTracker, StopReason, run_dispatch_loop,
};
use crate::error::{AppError, AppResult};
use crate::http::{ReqwestTransport, Transport};
use crate::output::{OUTPUT_CHANNEL_CAPACITY, OutputEvent, OutputSink, spawn_console_writer};

/// How long to let the console catch up after the run stops abnormally.
const WRITER_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    let config = match resolve_config(&mut args, &matches) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Incorrect usage: {}\n", err);
            eprintln!("{}", HammerArgs::command().render_help());
            return Err(err);
        }
    };
    let no_color = args.no_color || std::env::var_os("NO_COLOR").is_some();

    let workers = worker_threads(std::env::var("TOKIO_WORKER_THREADS").ok().as_deref());
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()?;

    runtime.block_on(run_async(config, workers, no_color))
}

/// Runtime worker count: a positive `TOKIO_WORKER_THREADS`, else available
/// parallelism.
fn worker_threads(env_value: Option<&str>) -> usize {
    env_value
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|workers| *workers > 0)
        .unwrap_or_else(default_concurrency)
}

fn parse_args() -> AppResult<(HammerArgs, ArgMatches)> {
    let matches = HammerArgs::command().get_matches();
    let args = HammerArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn resolve_config(args: &mut HammerArgs, matches: &ArgMatches) -> AppResult<RunConfig> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(RunConfig::from_args(args)?)
}

async fn run_async(config: RunConfig, workers: usize, no_color: bool) -> AppResult<()> {
    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::from_config(&config).map_err(AppError::http)?);
    let config = Arc::new(config);

    let (sink, events) = OutputSink::channel(OUTPUT_CHANNEL_CAPACITY);
    let writer = spawn_console_writer(events, no_color);

    sink.emit(OutputEvent::Info(format!(
        "max concurrent requests: {}",
        config.concurrency.get()
    )))
    .await;
    sink.emit(OutputEvent::Info(format!("worker threads: {}", workers)))
        .await;
    info!(
        targets = config.targets.len(),
        delay_ms = u64::try_from(config.delay.as_millis()).unwrap_or(u64::MAX),
        http2 = config.http2,
        "Starting load"
    );
    for target in config.targets.iter() {
        debug!(%target, "Target");
    }

    let admission = AdmissionController::new(config.concurrency);
    let ctx = Arc::new(CycleContext::new(
        config,
        transport,
        sink,
        DrainTracker::default(),
    ));

    let summary = run_dispatch_loop(Arc::clone(&ctx), &admission, None).await;
    info!(dispatched = summary.dispatched, "Run finished");

    match summary.reason {
        StopReason::AdmissionFailed(err) => {
            // In-flight cycles still hold sink clones, so the writer may not finish on its own.
            drop(ctx);
            if tokio::time::timeout(WRITER_FLUSH_TIMEOUT, writer).await.is_err() {
                debug!("Console writer still busy at exit");
            }
            Err(err.into())
        }
        StopReason::BudgetExhausted | StopReason::Shutdown => {
            drop(ctx);
            writer.await?;
            Ok(())
        }
    }
}
