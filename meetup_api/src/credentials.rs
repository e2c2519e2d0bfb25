//! Query-string authentication: a signing flag and the API key.

use std::fmt;

use url::Url;

use crate::Error;

pub(crate) const SIGN_PARAM: &str = "sign";
pub(crate) const KEY_PARAM: &str = "key";

/// API key for a single client. Never printed in full.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Rejects an empty (or all-whitespace) key.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::config("API key not specified"));
        }
        Ok(Self {
            api_key: api_key.to_string(),
        })
    }

    /// Adds `sign=true` and `key=<api key>` to the URL, leaving either one
    /// alone if the caller already set it.
    pub fn inject(&self, url: &mut Url) {
        let (has_sign, has_key) = url.query_pairs().fold((false, false), |acc, (k, _)| {
            (acc.0 || k == SIGN_PARAM, acc.1 || k == KEY_PARAM)
        });
        if has_sign && has_key {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        if !has_sign {
            pairs.append_pair(SIGN_PARAM, "true");
        }
        if !has_key {
            pairs.append_pair(KEY_PARAM, &self.api_key);
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Copy of `url` with the API key value masked, for logging.
pub(crate) fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == KEY_PARAM) {
        return url.to_string();
    }
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == KEY_PARAM { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
