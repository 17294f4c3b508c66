use std::num::NonZeroUsize;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("hammer/", env!("CARGO_PKG_VERSION"));

/// Config filenames picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["hammer.toml", "hammer.json"];

/// Statuses that do not produce a warning unless overridden.
pub(crate) const DEFAULT_EXPECTED_STATUS: [u16; 2] = [200, 404];

pub(crate) fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
