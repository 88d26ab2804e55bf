//! Wiring of the token provider, downstream client and routes.

use std::sync::Arc;

use axum::Router;

use crate::{
    api,
    config::Config,
    core::Core,
    downstream::{
        self,
        auth::{client_credentials::ClientCredentials, token_manager::TokenManager},
    },
};

pub fn build(config: &Config) -> Result<Router, reqwest::Error> {
    let mut reqwest_client = reqwest::Client::builder();
    if let Some(timeout) = config.downstream_timeout {
        reqwest_client = reqwest_client.timeout(timeout);
    }
    let reqwest_client = reqwest_client.build()?;

    let auth_token_provider = ClientCredentials {
        client: reqwest_client.clone(),
        registration: config.registration.clone(),
    };
    let auth_token_provider = TokenManager::new(auth_token_provider);

    let customers = downstream::Client::new(
        reqwest_client,
        &config.downstream_base_url,
        auth_token_provider,
    );

    let core = Arc::new(Core {
        customers: Box::new(customers),
    });

    Ok(api::http::routes(core))
}
