//! Typed wrappers over the generic fetch operations, one per API resource.

use crate::{
    fetch::Envelope,
    query::{require_urlname, EventQuery, GroupEventQuery, NoQuery, VenueQuery},
    types::{Pages, Record},
    Client, Error, PartialError,
};

impl Client {
    /// Fetches every Meetup category (`GET /2/categories`).
    pub async fn get_categories(&mut self) -> Result<Vec<Record>, Error> {
        let page = self
            .fetch_page(&["2", "categories"], &NoQuery::default(), Envelope::Legacy)
            .await?;
        Ok(page.records)
    }

    /// Fetches a group by its urlname (`GET /:urlname`).
    pub async fn get_group(&mut self, urlname: &str) -> Result<Record, Error> {
        let urlname = require_urlname(urlname)?;
        self.fetch_object(&[urlname]).await
    }

    /// Fetches one page of a group's venues (`GET /:urlname/venues`).
    pub async fn get_venues_by_group(
        &mut self,
        urlname: &str,
        query: &VenueQuery,
    ) -> Result<Vec<Record>, Error> {
        let urlname = require_urlname(urlname)?;
        let page = self
            .fetch_page(&[urlname, "venues"], query, Envelope::Modern)
            .await?;
        Ok(page.records)
    }

    /// Walks every page of a group's venues by offset.
    pub async fn get_all_venues_by_group(&mut self, urlname: &str) -> Result<Pages, PartialError> {
        let urlname = require_urlname(urlname)?;
        self.fetch_all_by_offset(&[urlname, "venues"], &VenueQuery::default(), Envelope::Modern)
            .await
    }

    /// Fetches one page of a group's events (`GET /:urlname/events`).
    pub async fn get_events_by_group(
        &mut self,
        urlname: &str,
        query: &GroupEventQuery,
    ) -> Result<Vec<Record>, Error> {
        let urlname = require_urlname(urlname)?;
        let page = self
            .fetch_page(&[urlname, "events"], query, Envelope::Modern)
            .await?;
        Ok(page.records)
    }

    /// Fetches a group's events and keeps following the `Link` header's
    /// `rel="next"` until the listing is exhausted.
    pub async fn get_all_events_by_group(
        &mut self,
        urlname: &str,
        query: &GroupEventQuery,
    ) -> Result<Pages, PartialError> {
        let urlname = require_urlname(urlname)?;
        self.fetch_all(&[urlname, "events"], query).await
    }

    /// Fetches one page of events from the legacy `GET /2/events`.
    pub async fn get_events(&mut self, query: &EventQuery) -> Result<Vec<Record>, Error> {
        let page = self
            .fetch_page(&["2", "events"], query, Envelope::Legacy)
            .await?;
        Ok(page.records)
    }

    /// Walks every page of the legacy `GET /2/events` by offset.
    pub async fn get_all_events(&mut self, query: &EventQuery) -> Result<Pages, PartialError> {
        self.fetch_all_by_offset(&["2", "events"], query, Envelope::Legacy)
            .await
    }
}
