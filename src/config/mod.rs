//! Configuration loading and the resolved run configuration.
mod apply;
mod loader;
mod run;
pub mod types;


pub use apply::apply_config;
pub use loader::load_config;
pub use run::{ExpectedStatus, RunConfig, Targets, build_header_map};

#[cfg(test)]
pub(crate) use loader::load_config_file;
