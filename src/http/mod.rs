//! HTTP transport used by request cycles.
mod client;
mod transport;

#[cfg(test)]
mod tests;

pub use client::build_client;
pub use transport::{BodyStream, ReqwestTransport, Transport, TransportRequest, TransportResponse};
