//! Request logging hooks. The client holds one of these instead of writing to
//! a process-wide logger; the default forwards to `tracing`.

use std::time::Duration;

use crate::Error;

/// Receives one call per completed request and one per failure, plus the
/// rate-limit events seen on responses.
pub trait RequestLog: Send + Sync {
    /// `url` has already had the API key masked.
    fn request(&self, method: &str, url: &str, status: u16);

    fn failure(&self, error: &Error, context: &str);

    /// Over half the quota is used; the next page waits `pause`.
    fn throttle(&self, pause: Duration) {
        tracing::info!("Throttling for {}s", pause.as_secs());
    }

    /// A response came back without usable rate-limit headers.
    fn rate_unavailable(&self) {
        tracing::warn!("Rate limit headers missing or malformed, skipping throttle check");
    }
}

/// Default sink: `info!` for requests, `error!` for failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl RequestLog for TracingLog {
    fn request(&self, method: &str, url: &str, status: u16) {
        tracing::info!("Method: {} Path: {} Status: {}", method, url, status);
    }

    fn failure(&self, error: &Error, context: &str) {
        tracing::error!("{}: {}", context, error);
    }
}
