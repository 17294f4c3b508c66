//! Console output. Every line goes through one writer task so concurrent
//! request cycles never interleave partial lines.
mod console;
mod sink;

pub use console::{ConsoleRenderer, spawn_console_writer};
pub use sink::{OUTPUT_CHANNEL_CAPACITY, OutputEvent, OutputSink};
