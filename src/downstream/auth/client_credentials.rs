//! Authorize using the client credentials flow.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::downstream::utils::{check_status, ServerError};

/// Upper bound on how long a granted token is trusted, whatever `expires_in` says.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
    #[error("form encoding: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),
    #[error("no access token returned for registration {registration_id}")]
    MissingToken { registration_id: String },
    #[error("unsupported token type {0:?}")]
    UnsupportedTokenType(String),
}

/// A pre-registered OAuth2 client the service authenticates as.
#[derive(Debug, Clone)]
pub struct Registration {
    pub registration_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_uri: String,
    pub scopes: Vec<String>,
}

pub struct ClientCredentials {
    pub client: reqwest::Client,
    pub registration: Registration,
}

impl ClientCredentials {
    /// Perform the client credentials flow.
    pub async fn perform(&self) -> Result<AuthResponse, Error> {
        let registration = &self.registration;
        let scope = registration.scopes.join(" ");

        let mut params = vec![
            ("grant_type", "client_credentials"),
            ("client_id", registration.client_id.as_str()),
            ("client_secret", registration.client_secret.as_str()),
        ];
        if !scope.is_empty() {
            params.push(("scope", scope.as_str()));
        }
        let params = serde_urlencoded::to_string(&params)?;

        debug!(
            message = "Requesting client credentials grant",
            registration_id = %registration.registration_id,
            token_uri = %registration.token_uri,
        );

        let req = self
            .client
            .post(&registration.token_uri)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .body(params)
            .build()?;

        let res = self.client.execute(req).await?;
        let res = check_status(res).await?;
        let auth_response = res.json().await?;
        Ok(auth_response)
    }

    fn token_from_response(&self, auth: AuthResponse) -> Result<Token, Error> {
        if let Some(token_type) = &auth.token_type {
            if !token_type.eq_ignore_ascii_case("bearer") {
                return Err(Error::UnsupportedTokenType(token_type.clone()));
            }
        }

        let access_token = match auth.access_token {
            Some(access_token) if !access_token.is_empty() => access_token,
            _ => {
                return Err(Error::MissingToken {
                    registration_id: self.registration.registration_id.clone(),
                })
            }
        };

        // Without a lifetime the token is only good for the current call.
        let expires_in = Duration::from_secs(auth.expires_in.unwrap_or_default());
        let now = Instant::now();
        let expires_at = now
            .checked_add(expires_in.min(MAX_TOKEN_LIFETIME))
            .unwrap_or(now);

        Ok(Token {
            access_token,
            expires_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// The requested access token.
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    /// The amount of time that an access token is valid (in seconds).
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub expires_at: Instant,
}

#[async_trait::async_trait]
impl super::TokenProvider for ClientCredentials {
    type Token = Token;
    type Error = Error;

    async fn get_auth_token(&self) -> Result<Self::Token, Self::Error> {
        let auth_response = self.perform().await?;
        self.token_from_response(auth_response)
    }
}

impl super::Token for Token {
    fn access_token(&self) -> &str {
        self.access_token.as_str()
    }
}

impl super::ExpiringToken for Token {
    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}
