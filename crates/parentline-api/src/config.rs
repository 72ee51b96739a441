//! REST client configuration.

use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Default path of the peer directory listing.
pub const DEFAULT_PEER_DIRECTORY_PATH: &str = "/users/teachers";

/// Configuration for the REST client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto.
    pub base_url: Url,
    /// Role-scoped peer directory path.
    pub peer_directory_path: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Creates a configuration with default paths and no timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ApiConfigBuilder {
        ApiConfigBuilder::new(base_url)
    }
}

/// Builder for [`ApiConfig`].
#[derive(Debug, Clone)]
pub struct ApiConfigBuilder {
    base_url: String,
    peer_directory_path: String,
    request_timeout: Option<Duration>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            peer_directory_path: DEFAULT_PEER_DIRECTORY_PATH.to_string(),
            request_timeout: None,
        }
    }

    /// Sets the peer directory path (e.g. `/users/parents` for teachers).
    #[must_use]
    pub fn peer_directory_path(mut self, path: impl Into<String>) -> Self {
        self.peer_directory_path = path.into();
        self
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or is not http(s).
    pub fn build(self) -> Result<ApiConfig> {
        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "base URL must be http or https: {base_url}"
            )));
        }

        Ok(ApiConfig {
            base_url,
            peer_directory_path: self.peer_directory_path,
            request_timeout: self.request_timeout,
        })
    }
}
