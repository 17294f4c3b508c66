use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::args::{
    DEFAULT_EXPECTED_STATUS, HammerArgs, PositiveU64, PositiveUsize, default_concurrency,
};
use crate::error::{ConfigError, ValidationError};

/// Resolved, immutable settings for one run. Shared read-only by every
/// request cycle.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub concurrency: PositiveUsize,
    pub delay: Duration,
    pub http2: bool,
    pub headers: HeaderMap,
    pub targets: Targets,
    pub expected_status: ExpectedStatus,
    pub max_requests: Option<PositiveU64>,
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl RunConfig {
    /// A configuration with defaults for everything but the targets.
    #[must_use]
    pub fn new(targets: Targets) -> Self {
        let concurrency =
            PositiveUsize::try_from(default_concurrency()).unwrap_or(PositiveUsize::MIN);
        Self {
            concurrency,
            delay: Duration::ZERO,
            http2: false,
            headers: HeaderMap::new(),
            targets,
            expected_status: ExpectedStatus::default(),
            max_requests: None,
            request_timeout: None,
            connect_timeout: None,
        }
    }

    /// Validates parsed CLI arguments into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when no URL was given, a URL is invalid, or a header
    /// cannot be represented on the wire.
    pub fn from_args(args: &HammerArgs) -> Result<Self, ConfigError> {
        let targets = Targets::parse(&args.urls)?;
        let headers = build_header_map(&args.headers)
            .map_err(|err| ConfigError::InvalidHeader { source: err })?;
        let mut config = Self::new(targets);
        if let Some(concurrency) = args.concurrency {
            config.concurrency = concurrency;
        }
        config.delay = args.delay;
        config.http2 = args.http2;
        config.headers = headers;
        config.expected_status = ExpectedStatus::new(args.expected_status.clone());
        config.max_requests = args.requests;
        config.request_timeout = args.request_timeout;
        config.connect_timeout = args.connect_timeout;
        Ok(config)
    }

    /// Fresh copy of the configured headers for a single request.
    #[must_use]
    pub fn request_headers(&self) -> HeaderMap {
        self.headers.clone()
    }
}

/// Builds a multi-valued header map; repeated names are appended, not replaced.
///
/// # Errors
///
/// Returns an error when a name or value is not a valid HTTP header.
pub fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap, ValidationError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            ValidationError::InvalidHeaderName {
                name: name.clone(),
                source: err,
            }
        })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|err| ValidationError::InvalidHeaderValue {
                name: name.clone(),
                source: err,
            })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Ordered, non-empty list of target URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    head: Url,
    tail: Vec<Url>,
}

impl Targets {
    /// # Errors
    ///
    /// Returns [`ConfigError::NoTargets`] when `urls` is empty.
    pub fn new(urls: Vec<Url>) -> Result<Self, ConfigError> {
        let mut urls = urls.into_iter();
        let head = urls.next().ok_or(ConfigError::NoTargets)?;
        Ok(Self {
            head,
            tail: urls.collect(),
        })
    }

    /// Parses absolute http(s) URLs.
    ///
    /// # Errors
    ///
    /// Returns an error when the list is empty, a URL does not parse, or its
    /// scheme is not http/https.
    pub fn parse<S>(raw: &[S]) -> Result<Self, ConfigError>
    where
        S: AsRef<str>,
    {
        let mut urls = Vec::with_capacity(raw.len());
        for value in raw {
            let value = value.as_ref().trim();
            let url = Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
                url: value.to_owned(),
                source: err,
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::UnsupportedScheme {
                    url: value.to_owned(),
                    scheme: url.scheme().to_owned(),
                });
            }
            urls.push(url);
        }
        Self::new(urls)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tail.len().saturating_add(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Round-robin pick for the given dispatch iteration.
    #[must_use]
    pub fn select(&self, iteration: u64) -> &Url {
        let len = u64::try_from(self.len()).unwrap_or(u64::MAX);
        let index = iteration
            .checked_rem(len)
            .and_then(|index| usize::try_from(index).ok())
            .unwrap_or(0);
        match index.checked_sub(1) {
            None => &self.head,
            Some(tail_index) => self.tail.get(tail_index).unwrap_or(&self.head),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }
}

/// Status codes that count as a normal response. Anything else is reported
/// as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedStatus(Vec<u16>);

impl ExpectedStatus {
    /// An empty list falls back to the default set.
    #[must_use]
    pub fn new(mut codes: Vec<u16>) -> Self {
        if codes.is_empty() {
            return Self::default();
        }
        codes.sort_unstable();
        codes.dedup();
        Self(codes)
    }

    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.0.binary_search(&status).is_ok()
    }

    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.0
    }
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        Self(DEFAULT_EXPECTED_STATUS.to_vec())
    }
}
