//! Single-page fetcher: one authenticated GET, decoded according to the
//! response envelope the endpoint uses.

use std::sync::Arc;

use reqwest::header::{HeaderMap, LINK};
use url::{Origin, Url};

use crate::{
    credentials::{redact, Credentials},
    log::RequestLog,
    rate::RateMonitor,
    types::{LegacyEnvelope, Page, Record},
    Error,
};

/// Response body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"results": [...]}`; continuation is driven by the caller's offset.
    Legacy,
    /// A bare JSON array; continuation comes from `Link: <...>; rel="next"`.
    Modern,
}

/// Something that can produce one page for a URL. Implemented by the HTTP
/// transport; pagination drivers are written against this.
pub(crate) trait PageSource {
    async fn fetch_page(
        &self,
        url: Url,
        envelope: Envelope,
        monitor: &mut RateMonitor,
    ) -> Result<Page, Error>;
}

/// HTTP side of a client: reqwest handle, credentials and log sink.
pub(crate) struct Transport {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: Credentials,
    pub(crate) log: Arc<dyn RequestLog>,
    /// Only URLs on this origin ever receive the API key.
    pub(crate) origin: Origin,
}

/// A successful response, drained.
pub(crate) struct Fetched {
    /// Final URL of the response; relative links resolve against it.
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

impl Transport {
    /// Sends one GET with credentials filled in. Rate headers are observed
    /// before the status is checked.
    pub(crate) async fn get_body(
        &self,
        mut url: Url,
        monitor: &mut RateMonitor,
    ) -> Result<Fetched, Error> {
        if url.origin() != self.origin {
            let err = Error::config(format!(
                "refusing to send credentials to {}",
                url.host_str().unwrap_or("<no host>")
            ));
            self.log.failure(&err, "Foreign URL");
            return Err(err);
        }
        self.credentials.inject(&mut url);
        let shown = redact(&url);

        let resp = self.http.get(url).send().await.map_err(|e| {
            let err = Error::Transport(e.without_url());
            self.log.failure(&err, "HTTP request failed");
            err
        })?;

        let status = resp.status();
        self.log.request("GET", &shown, status.as_u16());
        match monitor.observe(resp.headers()) {
            None => self.log.rate_unavailable(),
            Some(signal) if signal.over_half_used() => {
                self.log.throttle(monitor.throttle_pause())
            }
            Some(_) => {}
        }
        let headers = resp.headers().clone();
        let url = resp.url().clone();

        let body = resp.bytes().await.map_err(|e| {
            let err = Error::Read(e.without_url());
            self.log.failure(&err, "Failed to read response");
            err
        })?;

        if !status.is_success() {
            let err = Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            };
            self.log.failure(&err, "Unexpected status");
            return Err(err);
        }
        Ok(Fetched {
            url,
            headers,
            body: body.to_vec(),
        })
    }

    /// Fetches a single JSON object (no envelope, no paging).
    pub(crate) async fn fetch_object(
        &self,
        url: Url,
        monitor: &mut RateMonitor,
    ) -> Result<Record, Error> {
        let fetched = self.get_body(url, monitor).await?;
        serde_json::from_slice::<Record>(&fetched.body).map_err(|e| {
            let err = Error::Decode {
                message: e.to_string(),
                next: None,
            };
            self.log.failure(&err, "JSON decode failed");
            err
        })
    }
}

impl PageSource for Transport {
    async fn fetch_page(
        &self,
        url: Url,
        envelope: Envelope,
        monitor: &mut RateMonitor,
    ) -> Result<Page, Error> {
        let fetched = self.get_body(url, monitor).await?;
        decode_page(envelope, &fetched.headers, &fetched.body, &fetched.url).inspect_err(|err| {
            self.log.failure(err, "Response decode failed");
        })
    }
}

/// Decodes a body according to `envelope`. For modern bodies the `next` link
/// is read from the headers independently of the body, so a body decode
/// failure still reports it. `response_url` is the base for relative links.
pub(crate) fn decode_page(
    envelope: Envelope,
    headers: &HeaderMap,
    body: &[u8],
    response_url: &Url,
) -> Result<Page, Error> {
    match envelope {
        Envelope::Legacy => serde_json::from_slice::<LegacyEnvelope>(body)
            .map(|env| Page::new(env.results, None))
            .map_err(|e| Error::Decode {
                message: e.to_string(),
                next: None,
            }),
        Envelope::Modern => {
            let next = next_link(headers, response_url)?;
            match serde_json::from_slice::<Vec<Record>>(body) {
                Ok(records) => {
                    tracing::debug!("Results size: {}", records.len());
                    Ok(Page::new(records, next))
                }
                Err(e) => Err(Error::Decode {
                    message: e.to_string(),
                    next,
                }),
            }
        }
    }
}

/// The `rel="next"` target across all `Link` headers, resolved against
/// `base`. A link that is present but unusable (unresolvable, or on another
/// origin) is an error rather than the end of the collection.
pub(crate) fn next_link(headers: &HeaderMap, base: &Url) -> Result<Option<Url>, Error> {
    let Some(raw) = headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| parse_link_header(v, "next"))
    else {
        return Ok(None);
    };
    let next = base.join(&raw).map_err(|e| Error::Decode {
        message: format!("unusable next link: {}", e),
        next: None,
    })?;
    if next.origin() != base.origin() {
        return Err(Error::Decode {
            message: format!(
                "next link points at another host: {}",
                next.host_str().unwrap_or("<no host>")
            ),
            next: None,
        });
    }
    Ok(Some(next))
}

/// Extracts the target for `target_rel` from a header such as
/// `<https://host/a?page=2>; rel="next", <https://host/a?page=1>; rel="prev"`.
/// Commas and semicolons inside `<...>` belong to the target.
fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    for entry in split_entries(header) {
        let entry = entry.trim();
        let Some(rest) = entry.strip_prefix('<') else {
            continue;
        };
        let Some(close) = rest.find('>') else {
            continue;
        };
        let (uri, params) = (&rest[..close], &rest[close + 1..]);
        let matches = params.split(';').map(str::trim).any(|param| {
            param.strip_prefix("rel=").is_some_and(|value| {
                value
                    .trim_matches(|c| c == '"' || c == '\'')
                    .split_whitespace()
                    .any(|r| r == target_rel)
            })
        });
        if matches {
            return Some(uri.to_string());
        }
    }
    None
}

/// Splits a `Link` header at commas that sit outside `<...>`.
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_target = false;
    let mut start = 0;
    for (i, c) in header.char_indices() {
        match c {
            '<' => in_target = true,
            '>' => in_target = false,
            ',' if !in_target => {
                entries.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);
    entries
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
