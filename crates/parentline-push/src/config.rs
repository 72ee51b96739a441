//! Push channel configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default delay between reconnect attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Default capacity of the event queue.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Push channel configuration.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// WebSocket URL of the push delivery server.
    pub url: Url,
    /// Fixed delay between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Reconnect attempts after a failure before giving up; `None` retries forever.
    pub max_reconnect_attempts: Option<u32>,
    /// Capacity of the event queue between the socket task and the caller.
    pub event_buffer: usize,
}

impl PushConfig {
    /// Creates a configuration with default reconnect settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: &str) -> Result<Self> {
        PushConfigBuilder::new(url).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> PushConfigBuilder {
        PushConfigBuilder::new(url)
    }
}

/// Builder for [`PushConfig`].
#[derive(Debug, Clone)]
pub struct PushConfigBuilder {
    url: String,
    reconnect_delay: Duration,
    max_reconnect_attempts: Option<u32>,
    event_buffer: usize,
}

impl PushConfigBuilder {
    /// Creates a new builder for the given server URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            max_reconnect_attempts: None,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }

    /// Sets the delay between reconnect attempts.
    #[must_use]
    pub const fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Caps the number of reconnect attempts.
    #[must_use]
    pub const fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Sets the event queue capacity.
    #[must_use]
    pub const fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Builds the configuration.
    ///
    /// `http`/`https` URLs are rewritten to `ws`/`wss`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or uses another scheme.
    pub fn build(self) -> Result<PushConfig> {
        let mut url = Url::parse(&self.url)?;
        let scheme = match url.scheme() {
            "ws" | "http" => "ws",
            "wss" | "https" => "wss",
            other => {
                return Err(Error::InvalidConfig(format!(
                    "unsupported push URL scheme: {other}"
                )));
            }
        };
        if url.scheme() != scheme {
            url.set_scheme(scheme).map_err(|()| {
                Error::InvalidConfig(format!("cannot rewrite scheme of {}", self.url))
            })?;
        }

        Ok(PushConfig {
            url,
            reconnect_delay: self.reconnect_delay,
            max_reconnect_attempts: self.max_reconnect_attempts,
            event_buffer: self.event_buffer.max(1),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PushConfig::new("ws://localhost:5000").unwrap();
        assert_eq!(config.reconnect_delay, DEFAULT_RECONNECT_DELAY);
        assert!(config.max_reconnect_attempts.is_none());
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn test_http_scheme_rewritten() {
        let config = PushConfig::new("https://push.example.com/socket").unwrap();
        assert_eq!(config.url.as_str(), "wss://push.example.com/socket");

        let config = PushConfig::new("http://localhost:5000").unwrap();
        assert_eq!(config.url.scheme(), "ws");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            PushConfig::new("ftp://example.com"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(PushConfig::new("not a url").is_err());
    }

    #[test]
    fn test_builder() {
        let config = PushConfig::builder("ws://localhost:5000")
            .reconnect_delay(Duration::from_millis(50))
            .max_reconnect_attempts(3)
            .event_buffer(0)
            .build()
            .unwrap();
        assert_eq!(config.reconnect_delay, Duration::from_millis(50));
        assert_eq!(config.max_reconnect_attempts, Some(3));
        assert_eq!(config.event_buffer, 1);
    }
}
