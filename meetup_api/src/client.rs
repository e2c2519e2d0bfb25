//! HTTP client for the Meetup REST API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::{
    credentials::Credentials,
    fetch::{Envelope, PageSource, Transport},
    log::{RequestLog, TracingLog},
    paginate::{self, CancelToken, MAX_PAGE_SIZE},
    query::Query,
    rate::RateMonitor,
    types::{Page, Pages, Record},
    Error, PartialError,
};

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_BASE: &str = "https://api.meetup.com";

/// Construction-time settings for a [`Client`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL for the API. Defaults to `https://api.meetup.com`.
    pub base_url: String,
    pub timeout: Duration,
    /// Fixed pacing for multi-page calls; `None` uses header-driven throttling.
    pub requests_per_minute: Option<u32>,
    pub log: Arc<dyn RequestLog>,
    pub cancel: CancelToken,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
            requests_per_minute: None,
            log: Arc::new(TracingLog),
            cancel: CancelToken::default(),
        }
    }
}

impl ClientConfig {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = Some(rpm);
        self
    }

    pub fn log(mut self, log: Arc<dyn RequestLog>) -> Self {
        self.log = log;
        self
    }

    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("requests_per_minute", &self.requests_per_minute)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// HTTP client for the Meetup REST API.
///
/// One instance per API key. Calls take `&mut self` because every response
/// can update the throttle state; a client is not meant to be shared across
/// concurrent tasks.
pub struct Client {
    base_url: Url,
    transport: Transport,
    monitor: RateMonitor,
    cancel: CancelToken,
}

impl Client {
    /// Creates a client for the production API. Fails on an empty key.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Creates a client with custom settings. Used for testing with wiremock.
    pub fn with_config(api_key: &str, config: ClientConfig) -> Result<Self, Error> {
        let credentials = Credentials::new(api_key).inspect_err(|e| {
            config.log.failure(e, "Client construction failed");
        })?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("invalid base URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        let mut monitor = RateMonitor::new();
        if let Some(rpm) = config.requests_per_minute {
            monitor.set_fixed_rate(rpm)?;
        }

        Ok(Self {
            transport: Transport {
                http,
                credentials,
                log: config.log,
                origin: base_url.origin(),
            },
            base_url,
            monitor,
            cancel: config.cancel,
        })
    }

    /// Paces multi-page calls at `rpm` requests per minute from now on,
    /// regardless of rate-limit headers.
    pub fn set_rate_limit(&mut self, rpm: u32) -> Result<(), Error> {
        self.monitor.set_fixed_rate(rpm)
    }

    /// Replaces the token checked by multi-page calls.
    pub fn set_cancel_token(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    pub fn rate_monitor(&self) -> &RateMonitor {
        &self.monitor
    }

    pub(crate) fn get_url(&self, segments: &[&str], query: Option<&impl Query>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    /// One GET against `segments` (joined as a path under the base URL).
    pub async fn fetch_page<Q: Query>(
        &mut self,
        segments: &[&str],
        query: &Q,
        envelope: Envelope,
    ) -> Result<Page, Error> {
        query.validate()?;
        let url = self.get_url(segments, Some(query))?;
        self.transport
            .fetch_page(url, envelope, &mut self.monitor)
            .await
    }

    /// Every page of a modern-envelope collection, following `rel="next"`
    /// links from the first request until the server stops sending one.
    pub async fn fetch_all<Q: Query>(
        &mut self,
        segments: &[&str],
        query: &Q,
    ) -> Result<Pages, PartialError> {
        query.validate()?;
        let url = self.get_url(segments, Some(query))?;
        paginate::by_cursor(&self.transport, &mut self.monitor, url, &self.cancel).await
    }

    /// Every page of a collection walked by offset with the maximum page size,
    /// stopping at the first short page.
    pub async fn fetch_all_by_offset<Q: Query>(
        &mut self,
        segments: &[&str],
        query: &Q,
        envelope: Envelope,
    ) -> Result<Pages, PartialError> {
        query.validate()?;
        let url = self.get_url(segments, Some(query))?;
        paginate::by_offset(
            &self.transport,
            &mut self.monitor,
            &url,
            envelope,
            MAX_PAGE_SIZE,
            &self.cancel,
        )
        .await
    }

    /// A single JSON object with no paging.
    pub async fn fetch_object(&mut self, segments: &[&str]) -> Result<Record, Error> {
        let url = self.get_url(segments, None::<&crate::query::NoQuery>)?;
        self.transport.fetch_object(url, &mut self.monitor).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.transport.credentials)
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{NoQuery, VenueQuery};

    #[test]
    fn empty_key_yields_no_client() {
        assert!(matches!(Client::new(""), Err(Error::Configuration(_))));
        assert!(Client::new("abcde").is_ok());
    }

    #[test]
    fn zero_rpm_in_config_is_rejected() {
        let config = ClientConfig::default().requests_per_minute(0);
        assert!(matches!(
            Client::with_config("abcde", config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let config = ClientConfig::default().base_url("not a url");
        assert!(Client::with_config("abcde", config).is_err());
        let config = ClientConfig::default().base_url("mailto:someone@example.com");
        assert!(Client::with_config("abcde", config).is_err());
    }

    #[test]
    fn get_url_joins_segments() {
        let client = Client::new("abcde").unwrap();
        let url = client
            .get_url(&["rust-nyc", "venues"], Some(&VenueQuery::default()))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.meetup.com/rust-nyc/venues?page=50");

        let url = client.get_url(&["2", "categories"], None::<&NoQuery>).unwrap();
        assert_eq!(url.as_str(), "https://api.meetup.com/2/categories");
    }

    #[test]
    fn get_url_escapes_segments() {
        let client = Client::with_config(
            "abcde",
            ClientConfig::default().base_url("http://localhost:8080/api/"),
        )
        .unwrap();
        let url = client.get_url(&["a b", "events"], None::<&NoQuery>).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/a%20b/events");
    }

    #[test]
    fn debug_hides_key() {
        let client = Client::new("super-secret").unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }
}
