use std::str::FromStr;

use url::Url;

use crate::Error;

use super::common::{Query, QueryCommon};

/// Event lifecycle filter understood by both event endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventStatus {
    Upcoming,
    Past,
    Proposed,
    Suggested,
    Cancelled,
    Draft,
}
impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EventStatus::Upcoming => "upcoming",
                EventStatus::Past => "past",
                EventStatus::Proposed => "proposed",
                EventStatus::Suggested => "suggested",
                EventStatus::Cancelled => "cancelled",
                EventStatus::Draft => "draft",
            }
        )
    }
}
impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(EventStatus::Upcoming),
            "past" => Ok(EventStatus::Past),
            "proposed" => Ok(EventStatus::Proposed),
            "suggested" => Ok(EventStatus::Suggested),
            "cancelled" => Ok(EventStatus::Cancelled),
            "draft" => Ok(EventStatus::Draft),
            other => Err(Error::config(format!("unknown event status '{}'", other))),
        }
    }
}

/// Where a group event listing starts scrolling from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scroll {
    NextUpcoming,
    RecentPast,
}
impl std::fmt::Display for Scroll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Scroll::NextUpcoming => "next_upcoming",
                Scroll::RecentPast => "recent_past",
            }
        )
    }
}
impl FromStr for Scroll {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next_upcoming" => Ok(Scroll::NextUpcoming),
            "recent_past" => Ok(Scroll::RecentPast),
            other => Err(Error::config(format!("unknown scroll '{}'", other))),
        }
    }
}

/// Parameters for `GET /:urlname/events`.
#[derive(Clone, Debug, Default)]
pub struct GroupEventQuery {
    pub common: QueryCommon,
    pub scroll: Option<Scroll>,
    pub statuses: Vec<EventStatus>,
}

impl Query for GroupEventQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(scroll) = self.scroll {
            url.query_pairs_mut()
                .append_pair("scroll", &scroll.to_string());
        }
        if let Some(status) = join_statuses(&self.statuses) {
            url.query_pairs_mut().append_pair("status", &status);
        }
        url
    }

    fn validate(&self) -> Result<(), Error> {
        self.common.validate()
    }
}

impl GroupEventQuery {
    pub fn with_scroll(mut self, scroll: Scroll) -> Self {
        self.scroll = Some(scroll);
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.statuses.push(status);
        self
    }
}

/// Parameters for the legacy `GET /2/events`. At least one of the four
/// identifiers must be set.
#[derive(Clone, Debug, Default)]
pub struct EventQuery {
    pub common: QueryCommon,
    pub event_ids: Vec<String>,
    pub group_id: Option<String>,
    pub group_urlname: Option<String>,
    pub venue_id: Option<String>,
    pub statuses: Vec<EventStatus>,
}

impl Query for EventQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(status) = join_statuses(&self.statuses) {
                pairs.append_pair("status", &status);
            }
            if !self.event_ids.is_empty() {
                pairs.append_pair("event_id", &self.event_ids.join(","));
            }
            if let Some(group_id) = &self.group_id {
                pairs.append_pair("group_id", group_id);
            }
            if let Some(group_urlname) = &self.group_urlname {
                pairs.append_pair("group_urlname", group_urlname);
            }
            if let Some(venue_id) = &self.venue_id {
                pairs.append_pair("venue_id", venue_id);
            }
        }
        url
    }

    fn validate(&self) -> Result<(), Error> {
        self.common.validate()?;
        if self.event_ids.is_empty()
            && self.group_id.is_none()
            && self.group_urlname.is_none()
            && self.venue_id.is_none()
        {
            return Err(Error::config(
                "one of event_id, group_id, group_urlname or venue_id is required",
            ));
        }
        Ok(())
    }
}

impl EventQuery {
    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_ids.push(event_id.to_string());
        self
    }
    pub fn with_event_ids(mut self, event_ids: &[String]) -> Self {
        self.event_ids.extend_from_slice(event_ids);
        self
    }

    pub fn with_group_id(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    pub fn with_group_urlname(mut self, group_urlname: &str) -> Self {
        self.group_urlname = Some(group_urlname.to_string());
        self
    }

    pub fn with_venue_id(mut self, venue_id: &str) -> Self {
        self.venue_id = Some(venue_id.to_string());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.statuses.push(status);
        self
    }
}

fn join_statuses(statuses: &[EventStatus]) -> Option<String> {
    if statuses.is_empty() {
        return None;
    }
    Some(
        statuses
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn test_group_event_query() {
        let url = Url::parse("https://example.com/rust-nyc/events").unwrap();

        insta::assert_snapshot!(
            GroupEventQuery::default()
                .with_page(10)
                .with_scroll(Scroll::RecentPast)
                .with_status(EventStatus::Past)
                .with_status(EventStatus::Cancelled)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/rust-nyc/events?page=10&scroll=recent_past&status=past%2Ccancelled"
        );
    }

    #[test]
    fn test_event_query() {
        let url = Url::parse("https://example.com/2/events").unwrap();

        insta::assert_snapshot!(
            EventQuery::default()
                .with_group_urlname("rust-nyc")
                .with_venue_id("778")
                .with_status(EventStatus::Upcoming)
                .with_offset(1)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/2/events?page=50&offset=1&status=upcoming&group_urlname=rust-nyc&venue_id=778"
        );
    }

    #[test]
    fn event_query_requires_an_identifier() {
        let err = EventQuery::default()
            .with_status(EventStatus::Upcoming)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        assert!(EventQuery::default().with_group_id("42").validate().is_ok());
        assert!(EventQuery::default().with_event_id("e1").validate().is_ok());
        assert!(EventQuery::default().with_venue_id("v1").validate().is_ok());
    }

    #[test]
    fn event_query_checks_page_size() {
        let err = EventQuery::default()
            .with_group_id("42")
            .with_page(51)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn status_and_scroll_parse() {
        assert_eq!("Upcoming".parse::<EventStatus>().unwrap(), EventStatus::Upcoming);
        assert!("someday".parse::<EventStatus>().is_err());
        assert_eq!("next_upcoming".parse::<Scroll>().unwrap(), Scroll::NextUpcoming);
        assert!("sideways".parse::<Scroll>().is_err());
    }
}
