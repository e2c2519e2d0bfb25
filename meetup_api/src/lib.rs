//! Client for the Meetup REST API: authenticated GETs, both response
//! envelopes, header-driven throttling, and offset or link-following
//! pagination.

mod client;
mod credentials;
mod endpoints;
mod errors;
mod fetch;
pub mod log;
mod paginate;
mod query;
pub mod rate;
pub mod types;
pub use self::client::{Client, ClientConfig, API_BASE};
pub use self::credentials::Credentials;
pub use self::errors::{Error, PartialError};
pub use self::fetch::Envelope;
pub use self::paginate::{CancelToken, MAX_PAGE_SIZE};
pub use self::query::{
    EventQuery, EventStatus, GroupEventQuery, NoQuery, Query, QueryCommon, Scroll, VenueQuery,
};
