//! Bearer tokens for calls to the downstream customer service.
//!
//! The service authenticates as itself: [`client_credentials`] performs the grant for
//! one registration and [`token_manager`] keeps the last token until it is close to
//! expiry.

use std::time::Instant;

pub mod client_credentials;
pub mod token_manager;

/// Source of access tokens for outbound calls.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    type Token: Token;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get_auth_token(&self) -> Result<Self::Token, Self::Error>;
}

pub trait Token: Send {
    /// Value sent as `Authorization: Bearer <access_token>`.
    fn access_token(&self) -> &str;
}

pub trait ExpiringToken: Token {
    fn expires_at(&self) -> Instant;
}
