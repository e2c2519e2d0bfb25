//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] paging fields.

use url::Url;

use crate::{paginate::MAX_PAGE_SIZE, Error};

/// Trait implemented by all query builders. Provides URL serialization,
/// validation, and shared builder methods for paging.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Checks the query before any request is made.
    fn validate(&self) -> Result<(), Error>;

    /// Sets the number of results per page (at most 50).
    fn with_page(mut self, page: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = Some(page);
        self
    }

    /// Sets the page offset (0, 1, 2, ...), counted in pages rather than records.
    fn with_offset(mut self, offset: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().offset = Some(offset);
        self
    }
}

/// Paging fields shared by all list queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryCommon {
    /// Results per page. `None` asks for the maximum.
    pub page: Option<u32>,
    /// Page offset. `None` leaves it to the API (first page).
    pub offset: Option<u32>,
}

impl QueryCommon {
    pub fn validate(&self) -> Result<(), Error> {
        match self.page {
            Some(page) if page > MAX_PAGE_SIZE => Err(Error::config(format!(
                "page size {} exceeds maximum of {}",
                page, MAX_PAGE_SIZE
            ))),
            _ => Ok(()),
        }
    }

    /// Appends `page` (defaulting to the maximum) and `offset` if set.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair(
            "page",
            &self.page.unwrap_or(MAX_PAGE_SIZE).to_string(),
        );
        if let Some(offset) = self.offset {
            url.query_pairs_mut()
                .append_pair("offset", &offset.to_string());
        }
        url
    }
}

/// Query for endpoints that take no parameters at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoQuery {
    common: QueryCommon,
}

impl Query for NoQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        url.clone()
    }

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Rejects an empty group urlname.
pub(crate) fn require_urlname(urlname: &str) -> Result<&str, Error> {
    let trimmed = urlname.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(Error::config("group urlname is required"));
    }
    Ok(trimmed)
}
