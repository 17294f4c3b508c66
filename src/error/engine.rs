use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("permit pool was cancelled")]
    Cancelled,
}

impl From<tokio::sync::AcquireError> for AdmissionError {
    fn from(_closed: tokio::sync::AcquireError) -> Self {
        AdmissionError::Cancelled
    }
}
