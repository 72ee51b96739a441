//! Persistent settings with environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parentline_api::{ApiConfig, Role, Session};
use parentline_push::PushConfig;
use serde::{Deserialize, Serialize};

use crate::engine::{DEFAULT_ATTACHMENT_CAP, EngineOptions};
use crate::error::{Error, Result};

/// Environment variable overriding [`Settings::api_url`].
pub const ENV_API_URL: &str = "PARENTLINE_API_URL";
/// Environment variable overriding [`Settings::push_url`].
pub const ENV_PUSH_URL: &str = "PARENTLINE_PUSH_URL";
/// Environment variable overriding [`Settings::token`].
pub const ENV_TOKEN: &str = "PARENTLINE_TOKEN";
/// Environment variable overriding [`Settings::user_id`].
pub const ENV_USER_ID: &str = "PARENTLINE_USER_ID";
/// Environment variable overriding [`Settings::role`].
pub const ENV_ROLE: &str = "PARENTLINE_ROLE";

/// Client settings stored as `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the REST services.
    pub api_url: String,
    /// URL of the push delivery server.
    pub push_url: String,
    /// Peer directory path; derived from the role when unset.
    pub peer_directory_path: Option<String>,
    /// Bearer token of the session.
    pub token: Option<String>,
    /// Local account id.
    pub user_id: Option<String>,
    /// Local account role.
    pub role: Role,
    /// Count unread pushes locally.
    pub local_unread_tracking: bool,
    /// Resync after a push reconnect.
    pub resync_on_reconnect: bool,
    /// Maximum attachments per message.
    pub attachment_cap: usize,
    /// Seconds between push reconnect attempts.
    pub reconnect_delay_secs: u64,
    /// Push reconnect attempts before giving up; unlimited when unset.
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            push_url: "ws://localhost:5000".to_string(),
            peer_directory_path: None,
            token: None,
            user_id: None,
            role: Role::Parent,
            local_unread_tracking: false,
            resync_on_reconnect: true,
            attachment_cap: DEFAULT_ATTACHMENT_CAP,
            reconnect_delay_secs: 2,
            max_reconnect_attempts: None,
        }
    }
}

impl Settings {
    /// Default settings file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parentline")
            .join("settings.json")
    }

    /// Loads settings from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes settings to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Applies `PARENTLINE_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `PARENTLINE_ROLE` is not a known role.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns an error if the role override is not a known role.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(url) = lookup(ENV_PUSH_URL) {
            self.push_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(user_id) = lookup(ENV_USER_ID) {
            self.user_id = Some(user_id);
        }
        if let Some(role) = lookup(ENV_ROLE) {
            self.role = role.parse().map_err(Error::Config)?;
        }
        Ok(())
    }

    /// Peer directory path for the configured role.
    #[must_use]
    pub fn directory_path(&self) -> String {
        self.peer_directory_path.clone().unwrap_or_else(|| {
            match self.role {
                Role::Teacher => "/users/parents",
                Role::Parent | Role::Admin => parentline_api::DEFAULT_PEER_DIRECTORY_PATH,
            }
            .to_string()
        })
    }

    /// Builds the session context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the token or user id is missing.
    pub fn session(&self) -> Result<Session> {
        let token = non_empty(self.token.as_deref())
            .ok_or_else(|| Error::Config(format!("no session token; set {ENV_TOKEN}")))?;
        let user_id = non_empty(self.user_id.as_deref())
            .ok_or_else(|| Error::Config(format!("no user id; set {ENV_USER_ID}")))?;
        Ok(Session::new(user_id, self.role, token))
    }

    /// Builds the REST client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid.
    pub fn api_config(&self) -> Result<ApiConfig> {
        Ok(ApiConfig::builder(self.api_url.as_str())
            .peer_directory_path(self.directory_path())
            .build()?)
    }

    /// Builds the push channel configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the push URL is invalid.
    pub fn push_config(&self) -> Result<PushConfig> {
        let mut builder = PushConfig::builder(self.push_url.as_str())
            .reconnect_delay(Duration::from_secs(self.reconnect_delay_secs));
        if let Some(attempts) = self.max_reconnect_attempts {
            builder = builder.max_reconnect_attempts(attempts);
        }
        Ok(builder.build()?)
    }

    /// Engine switches.
    #[must_use]
    pub const fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            local_unread_tracking: self.local_unread_tracking,
            resync_on_reconnect: self.resync_on_reconnect,
            attachment_cap: self.attachment_cap,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
