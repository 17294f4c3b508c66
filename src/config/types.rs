use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_delay_arg;
use crate::error::ValidationError;

/// On-disk configuration; every field is optional and CLI flags win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "url")]
    pub urls: Option<Vec<String>>,
    #[serde(alias = "concurrency_factor")]
    pub concurrency: Option<usize>,
    pub delay: Option<DurationValue>,
    pub http2: Option<bool>,
    pub headers: Option<Vec<String>>,
    #[serde(alias = "status")]
    pub expected_status: Option<Vec<u16>>,
    pub requests: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_delay_arg(text),
        }
    }
}
