//! Core library for the `hammer` CLI.
//!
//! `hammer` keeps a bounded number of GET requests in flight against one or
//! more URLs, cycling through them round-robin, and reports throughput. The
//! building blocks are exposed here: CLI argument types, configuration, the
//! HTTP transport, the dispatch engine, and console output.
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod output;
pub mod shutdown;
pub mod stats;
