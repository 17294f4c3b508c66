use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "HAMMER_LOG";

/// Installs the global subscriber writing to stderr, so logs never mix with
/// the progress line on stdout. Later calls keep the first subscriber.
pub fn init_logging(verbose: bool) {
    let filter = log_filter(
        verbose,
        std::env::var(LOG_ENV).ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
    );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::dispatcher::has_been_set() {
        return;
    }
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// `HAMMER_LOG` wins over `RUST_LOG`. Without either, or with an unparsable
/// directive, the level follows `--verbose`.
fn log_filter(verbose: bool, hammer_log: Option<&str>, rust_log: Option<&str>) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    hammer_log
        .or(rust_log)
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}
