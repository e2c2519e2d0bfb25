mod common;
pub use self::common::{NoQuery, Query, QueryCommon};
pub(crate) use self::common::require_urlname;

mod venue;
pub use self::venue::VenueQuery;

mod event;
pub use self::event::{EventQuery, EventStatus, GroupEventQuery, Scroll};
