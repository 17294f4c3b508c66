//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::HammerArgs;
pub use types::{PositiveU64, PositiveUsize};

pub(crate) use defaults::{
    DEFAULT_CONFIG_FILES, DEFAULT_EXPECTED_STATUS, DEFAULT_USER_AGENT, default_concurrency,
};
pub(crate) use parsers::{parse_duration_arg, parse_header, validate_status_code};
