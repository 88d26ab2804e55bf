//! Runtime configuration, read from the environment.

use std::{net::SocketAddr, time::Duration};

use crate::downstream::auth::client_credentials::Registration;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_DOWNSTREAM_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REGISTRATION_ID: &str = "spring-modulith-call";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("env var {0} is not set")]
    Missing(&'static str),
    #[error("env var {key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub downstream_base_url: String,
    pub downstream_timeout: Option<Duration>,
    pub registration: Registration,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(Error::Missing(key));

        let listen_addr = optional("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        let listen_addr = listen_addr.parse().map_err(|_| Error::Invalid {
            key: "LISTEN_ADDR",
            value: listen_addr.clone(),
        })?;

        let downstream_timeout = match optional("DOWNSTREAM_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.parse().map_err(|_| Error::Invalid {
                    key: "DOWNSTREAM_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let scopes = optional("OAUTH2_SCOPES")
            .map(|value| {
                value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|scope| !scope.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let registration = Registration {
            registration_id: optional("OAUTH2_REGISTRATION_ID")
                .unwrap_or_else(|| DEFAULT_REGISTRATION_ID.into()),
            client_id: required("OAUTH2_CLIENT_ID")?,
            client_secret: required("OAUTH2_CLIENT_SECRET")?,
            token_uri: required("OAUTH2_TOKEN_URI")?,
            scopes,
        };

        Ok(Self {
            listen_addr,
            downstream_base_url: optional("DOWNSTREAM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DOWNSTREAM_BASE_URL.into()),
            downstream_timeout,
            registration,
        })
    }
}
