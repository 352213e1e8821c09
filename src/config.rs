use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::error::ConfigMissing;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/grades";

pub const ENV_API_URL: &str = "NOTAS_API_URL";
pub const ENV_API_KEY: &str = "NOTAS_API_KEY";
pub const ENV_REQUIRE_KEY: &str = "NOTAS_REQUIRE_KEY";

/// Whether requests carry an `x-api-key` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Never send a key.
    #[default]
    None,
    /// Send the key when one is set.
    Optional,
    /// Refuse to issue requests until a key is set.
    Required,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(AuthMode::None),
            "optional" => Ok(AuthMode::Optional),
            "required" | "on" => Ok(AuthMode::Required),
            other => Err(format!("unknown auth mode '{}' (expected none, optional or required)", other)),
        }
    }
}

/// Where and how to reach the grades API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub endpoint_url: String,
    pub api_key: Option<String>,
    pub auth: AuthMode,
}

impl ConnectionConfig {
    /// A fixed endpoint without authentication.
    pub fn fixed(endpoint_url: impl Into<String>) -> Self {
        ConnectionConfig {
            endpoint_url: endpoint_url.into(),
            api_key: None,
            auth: AuthMode::None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        if self.auth == AuthMode::None {
            self.auth = AuthMode::Optional;
        }
        self
    }

    pub fn requiring_key(mut self) -> Self {
        self.auth = AuthMode::Required;
        self
    }

    /// Checks the fields a request cannot go out without.
    pub fn validate(&self) -> Result<(), ConfigMissing> {
        if self.endpoint().is_empty() {
            return Err(ConfigMissing::EndpointUrl);
        }
        if self.auth == AuthMode::Required && self.api_key().is_none() {
            return Err(ConfigMissing::ApiKey);
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint_url.trim()
    }

    /// The key to attach to requests, if any.
    pub fn api_key(&self) -> Option<&str> {
        if self.auth == AuthMode::None {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig::fixed(DEFAULT_ENDPOINT)
    }
}

/// Hands out the connection settings in force right now. Asked once per
/// operation, so edits made between operations take effect immediately.
pub trait ConfigSource: Send + Sync {
    fn current(&self) -> ConnectionConfig;
}

impl ConfigSource for ConnectionConfig {
    fn current(&self) -> ConnectionConfig {
        self.clone()
    }
}

/// Settings the user can edit while a session runs. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    inner: Arc<Mutex<ConnectionConfig>>,
}

impl SessionConfig {
    pub fn new(initial: ConnectionConfig) -> Self {
        SessionConfig {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionConfig> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_endpoint(&self, endpoint_url: impl Into<String>) {
        self.lock().endpoint_url = endpoint_url.into();
    }

    /// An empty key clears it.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        let api_key = api_key.into();
        let mut config = self.lock();
        config.api_key = if api_key.trim().is_empty() { None } else { Some(api_key) };
        if config.api_key.is_some() && config.auth == AuthMode::None {
            config.auth = AuthMode::Optional;
        }
    }

    pub fn set_auth(&self, auth: AuthMode) {
        self.lock().auth = auth;
    }
}

impl ConfigSource for SessionConfig {
    fn current(&self) -> ConnectionConfig {
        self.lock().clone()
    }
}
