//! Rate-limit header monitoring and inter-page pacing.
//!
//! The API reports its quota on every response. Once more than half of the
//! current window has been used, the monitor records a one-shot pause of half
//! the time left in the window. A caller-configured fixed rate overrides the
//! adaptive pause entirely.

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::Error;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota figures read from a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSignal {
    /// Calls left in the current window.
    pub remaining: u64,
    /// Seconds until the window resets.
    pub window_remaining: u64,
    pub limit: u64,
}

impl RateSignal {
    /// Reads the three quota headers. Returns `None` if any is absent or not
    /// an integer.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            remaining: header_u64(headers, REMAINING_HEADER)?,
            window_remaining: header_u64(headers, RESET_HEADER)?,
            limit: header_u64(headers, LIMIT_HEADER)?,
        })
    }

    /// More than half the quota is spent.
    pub fn over_half_used(&self) -> bool {
        self.limit.saturating_sub(self.remaining) > self.limit / 2
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Pacing state owned by a single client.
#[derive(Debug, Clone, Default)]
pub struct RateMonitor {
    requests_per_minute: Option<u32>,
    throttled: bool,
    pause: Duration,
}

impl RateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins pacing to `rpm` requests per minute. Zero is rejected.
    pub fn set_fixed_rate(&mut self, rpm: u32) -> Result<(), Error> {
        if rpm == 0 {
            return Err(Error::config("requests per minute must be positive"));
        }
        self.requests_per_minute = Some(rpm);
        Ok(())
    }

    pub fn fixed_rate(&self) -> Option<u32> {
        self.requests_per_minute
    }

    pub fn is_throttled(&self) -> bool {
        self.throttled
    }

    /// Pause that will be applied once while throttled.
    pub fn throttle_pause(&self) -> Duration {
        self.pause
    }

    /// Inspects response headers and enters the throttled state when over half
    /// the window's quota is used. Never clears an existing throttle; missing
    /// headers leave the state untouched.
    pub fn observe(&mut self, headers: &HeaderMap) -> Option<RateSignal> {
        let signal = RateSignal::from_headers(headers)?;
        tracing::debug!(
            "API limit {} remaining {} window {}s",
            signal.limit,
            signal.remaining,
            signal.window_remaining
        );
        self.apply(signal);
        Some(signal)
    }

    pub(crate) fn apply(&mut self, signal: RateSignal) {
        if signal.over_half_used() {
            self.throttled = true;
            self.pause = Duration::from_secs(signal.window_remaining / 2);
        }
    }

    /// Delay to wait before the next page. A fixed rate always wins;
    /// otherwise a pending throttle pause is handed out once and cleared.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if let Some(rpm) = self.requests_per_minute {
            return Some(Duration::from_secs_f64(60.0 / f64::from(rpm)));
        }
        if self.throttled {
            self.throttled = false;
            return Some(self.pause);
        }
        None
    }
}
