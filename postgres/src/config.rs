//! Connection settings.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Endpoint {
    pub host: String,
    #[cfg_attr(feature = "serde", serde(default = "default_port"))]
    pub port: u16,
    pub db_name: String,
}

#[cfg(feature = "serde")]
fn default_port() -> u16 {
    Endpoint::DEFAULT_PORT
}

impl Endpoint {
    pub const DEFAULT_PORT: u16 = 5432;

    pub fn new(host: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            db_name: db_name.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Credentials.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Auth {
    pub user: String,
    pub password: Option<String>,
}

impl Auth {
    pub fn new(user: impl Into<String>, password: Option<String>) -> Self {
        Self {
            user: user.into(),
            password,
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Optional session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Command-line options sent to the server, e.g. `-c search_path=app`
    pub options: Option<String>,
    pub application_name: Option<String>,
    /// Seconds
    pub connect_timeout: Option<u64>,
}

/// Builds a driver configuration from the typed settings.
pub(crate) fn driver_config(
    endpoint: &Endpoint,
    auth: Option<&Auth>,
    options: Option<&Options>,
) -> postgres::Config {
    let mut config = postgres::Config::new();
    config
        .host(&endpoint.host)
        .port(endpoint.port)
        .dbname(&endpoint.db_name);
    if let Some(auth) = auth {
        config.user(&auth.user);
        if let Some(password) = &auth.password {
            config.password(password);
        }
    }
    if let Some(options) = options {
        if let Some(value) = &options.options {
            config.options(value);
        }
        if let Some(name) = &options.application_name {
            config.application_name(name);
        }
        if let Some(secs) = options.connect_timeout {
            config.connect_timeout(Duration::from_secs(secs));
        }
    }
    config
}
