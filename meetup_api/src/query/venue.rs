use url::Url;

use crate::Error;

use super::common::{Query, QueryCommon};

/// Parameters for `GET /:urlname/venues`.
#[derive(Clone, Debug, Default)]
pub struct VenueQuery {
    pub common: QueryCommon,
}

impl Query for VenueQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        self.common.add_to_url(url)
    }

    fn validate(&self) -> Result<(), Error> {
        self.common.validate()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{Query, VenueQuery};

    #[test]
    fn test_venue_query() {
        let url = Url::parse("https://example.com/rust-nyc/venues").unwrap();

        insta::assert_snapshot!(
            VenueQuery::default().with_page(20).with_offset(2).add_to_url(&url).to_string(),
            @"https://example.com/rust-nyc/venues?page=20&offset=2"
        );
        insta::assert_snapshot!(
            VenueQuery::default().add_to_url(&url).to_string(),
            @"https://example.com/rust-nyc/venues?page=50"
        );
    }
}
