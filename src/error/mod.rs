mod app;
mod config;
mod engine;
mod http;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use engine::AdmissionError;
pub use http::{HttpError, TransportError};
pub use validation::ValidationError;
