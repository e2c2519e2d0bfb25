//! Pagination drivers.
//!
//! Offset mode walks `offset = 0, 1, 2, ...` with a fixed page size until a
//! short page comes back. Cursor mode follows the server's `rel="next"` link
//! until none is given. Both pace themselves with the client's
//! [`RateMonitor`] between pages and stop on the first error, returning the
//! pages collected so far alongside it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Instant};
use url::Url;

use crate::{
    fetch::{Envelope, PageSource},
    rate::RateMonitor,
    types::Pages,
    Error, PartialError,
};

/// Largest page the API serves.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Cooperative cancellation for a pagination run. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also trips once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Sleeps for whatever the monitor asks before the next page.
async fn pace(monitor: &mut RateMonitor, cancel: &CancelToken) -> Result<(), Error> {
    cancel.check()?;
    if let Some(delay) = monitor.next_delay() {
        tracing::debug!("Sleeping {:?} before next page", delay);
        sleep(delay).await;
    }
    Ok(())
}

/// Fetches `base` with `page=<page_size>&offset=<n>` for n = 0, 1, ... and
/// stops after the first page holding fewer than `page_size` records.
pub(crate) async fn by_offset<S: PageSource>(
    source: &S,
    monitor: &mut RateMonitor,
    base: &Url,
    envelope: Envelope,
    page_size: u32,
    cancel: &CancelToken,
) -> Result<Pages, PartialError> {
    let mut pages = Pages::default();
    let mut offset: u32 = 0;
    loop {
        if let Err(e) = cancel.check() {
            return Err(PartialError::new(pages, e));
        }
        let url = with_offset(base, page_size, offset);
        match source.fetch_page(url, envelope, monitor).await {
            Ok(page) => {
                let short = page.len() < page_size as usize;
                pages.push(page);
                if short {
                    return Ok(pages);
                }
            }
            Err(e) => return Err(PartialError::new(pages, e)),
        }
        offset += 1;
        if let Err(e) = pace(monitor, cancel).await {
            return Err(PartialError::new(pages, e));
        }
    }
}

/// Follows `rel="next"` links starting from `start` until a page has none.
pub(crate) async fn by_cursor<S: PageSource>(
    source: &S,
    monitor: &mut RateMonitor,
    start: Url,
    cancel: &CancelToken,
) -> Result<Pages, PartialError> {
    let mut pages = Pages::default();
    let mut url = start;
    loop {
        if let Err(e) = cancel.check() {
            return Err(PartialError::new(pages, e));
        }
        let page = match source.fetch_page(url, Envelope::Modern, monitor).await {
            Ok(page) => page,
            Err(e) => return Err(PartialError::new(pages, e)),
        };
        let next = page.next.clone();
        tracing::debug!("Next link: {:?}", next.as_ref().map(Url::as_str));
        pages.push(page);
        match next {
            Some(next) => url = next,
            None => return Ok(pages),
        }
        if let Err(e) = pace(monitor, cancel).await {
            return Err(PartialError::new(pages, e));
        }
    }
}

/// `base` with `page` and `offset` set, replacing any existing values.
fn with_offset(base: &Url, page_size: u32, offset: u32) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != "page" && k != "offset")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page_size.to_string())
        .append_pair("offset", &offset.to_string());
    url
}
