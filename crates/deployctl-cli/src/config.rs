//! Server connection configuration.

use thiserror::Error;

pub const ENV_HOST: &str = "DEPLOYCTL_HOST";
pub const ENV_API_KEY: &str = "DEPLOYCTL_API_KEY";
pub const ENV_SPACE: &str = "DEPLOYCTL_SPACE";

/// Configuration could not be assembled.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required settings were neither passed as flags nor set in the environment.
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// How to reach the deployment server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server base URL.
    pub server_url: String,

    /// API key sent with every request.
    pub api_key: String,

    /// Space to scope requests to, if any.
    pub space: Option<String>,
}

impl Config {
    /// Build the configuration from flag overrides, falling back to the environment.
    pub fn resolve(
        server_url: Option<String>,
        api_key: Option<String>,
        space: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::resolve_with(server_url, api_key, space, |key| std::env::var(key).ok())
    }

    /// Like [`Config::resolve`] with an explicit environment lookup.
    ///
    /// Every missing setting is reported at once.
    pub fn resolve_with(
        server_url: Option<String>,
        api_key: Option<String>,
        space: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |flag: Option<String>, key: &str| {
            flag.or_else(|| env(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_url = lookup(server_url, ENV_HOST);
        let api_key = lookup(api_key, ENV_API_KEY);
        let space = lookup(space, ENV_SPACE);

        match (server_url, api_key) {
            (Some(server_url), Some(api_key)) => Ok(Self {
                server_url,
                api_key,
                space,
            }),
            (server_url, api_key) => {
                let mut missing = Vec::new();
                if server_url.is_none() {
                    missing.push(ENV_HOST);
                }
                if api_key.is_none() {
                    missing.push(ENV_API_KEY);
                }
                Err(ConfigError::Missing(missing))
            }
        }
    }
}
