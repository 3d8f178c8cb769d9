use std::time::Duration;

use derive_getters::Getters;
use url::Url;

use crate::constants::domains::{POE_COOKIE_DOMAIN, POE_WEB};
use crate::constants::{REQUEST_LIMIT, REQUEST_TIMEOUT_SECS};
use crate::errors::unknown_error;
use crate::Error;

#[derive(Clone, Getters, Debug)]
pub struct SessionConfig {
    base_url: Url,
    /// `None` scopes the session cookie to the host of `base_url`
    cookie_domain: Option<String>,
    request_limit: usize,
    timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(&format!("{}/", POE_WEB)).expect("static url"),
            cookie_domain: Some(POE_COOKIE_DOMAIN.to_string()),
            request_limit: REQUEST_LIMIT,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SessionConfig {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url).map_err(unknown_error)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            cookie_domain: None,
            ..Default::default()
        })
    }

    pub fn with_cookie_domain(mut self, domain: Option<String>) -> Self {
        self.cookie_domain = domain;
        self
    }

    pub fn with_request_limit(mut self, limit: usize) -> Self {
        self.request_limit = limit.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
