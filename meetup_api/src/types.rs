use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Records are passed through untouched; the client never interprets them.
pub type Record = Value;

/// One response's worth of records, plus the server-advertised continuation
/// for modern-envelope collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub next: Option<Url>,
}

impl Page {
    pub fn new(records: Vec<Record>, next: Option<Url>) -> Self {
        Self { records, next }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pages in fetch order. Boundaries are preserved; overlapping pages from the
/// server are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pages(Vec<Page>);

impl Pages {
    pub(crate) fn push(&mut self, page: Page) {
        self.0.push(page);
    }

    /// Number of pages fetched.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.0.iter()
    }

    /// Total records across all pages.
    pub fn record_count(&self) -> usize {
        self.0.iter().map(Page::len).sum()
    }

    /// Borrowing view over every record, flattened in fetch order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.0.iter().flat_map(|page| page.records.iter())
    }

    /// Flattens into a single record sequence, dropping page boundaries.
    pub fn into_records(self) -> Vec<Record> {
        self.0.into_iter().flat_map(|page| page.records).collect()
    }

    pub fn into_inner(self) -> Vec<Page> {
        self.0
    }
}

impl From<Vec<Page>> for Pages {
    fn from(pages: Vec<Page>) -> Self {
        Self(pages)
    }
}

impl IntoIterator for Pages {
    type Item = Page;
    type IntoIter = std::vec::IntoIter<Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Pages {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Legacy (`/2/...`) response body: records wrapped in a `results` field.
#[derive(Serialize, Deserialize)]
pub struct LegacyEnvelope {
    pub results: Vec<Record>,
}
