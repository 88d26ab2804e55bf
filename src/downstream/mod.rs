//! Client for the downstream customer service.

use reqwest::Method;
use tracing::debug;

use crate::core::{Customer, CustomerId};

use self::{
    auth::Token,
    utils::{check_status, ServerError},
};

pub mod auth;
mod utils;

pub struct Client<AuthTokenProvider> {
    pub client: reqwest::Client,
    pub base_url: String,
    pub auth_token_provider: AuthTokenProvider,
}

#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("auth: {0}")]
    Auth(#[source] AuthError),
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
}

impl<AuthTokenProvider> Client<AuthTokenProvider>
where
    AuthTokenProvider: auth::TokenProvider,
{
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        auth_token_provider: AuthTokenProvider,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_token_provider,
        }
    }

    fn build_customers_url(&self, id: Option<CustomerId>) -> String {
        match id {
            Some(id) => format!("{}/customers/{}", self.base_url, id),
            None => format!("{}/customers", self.base_url),
        }
    }

    fn build_request(
        &self,
        auth_token: &str,
        method: Method,
        url: &str,
        body: Option<&Customer>,
    ) -> Result<reqwest::Request, Error<AuthTokenProvider::Error>> {
        let builder = self
            .client
            .request(method, url)
            .bearer_auth(auth_token)
            .header(reqwest::header::ACCEPT, "application/json");

        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };

        builder.build().map_err(Error::Reqwest)
    }

    async fn get_auth_token(&self) -> Result<String, Error<AuthTokenProvider::Error>> {
        let token = self
            .auth_token_provider
            .get_auth_token()
            .await
            .map_err(Error::Auth)?;
        Ok(token.access_token().to_owned())
    }

    pub async fn fetch_customer(
        &self,
        id: CustomerId,
    ) -> Result<Customer, Error<AuthTokenProvider::Error>> {
        let auth_token = self.get_auth_token().await?;
        let url = self.build_customers_url(Some(id));
        let res = self
            .exec(self.build_request(&auth_token, Method::GET, &url, None)?)
            .await?;
        Self::parse_json(res).await
    }

    pub async fn create_customer(
        &self,
        customer: &Customer,
    ) -> Result<Customer, Error<AuthTokenProvider::Error>> {
        let auth_token = self.get_auth_token().await?;
        let url = self.build_customers_url(None);
        let res = self
            .exec(self.build_request(&auth_token, Method::POST, &url, Some(customer))?)
            .await?;
        Self::parse_json(res).await
    }

    async fn exec(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, Error<AuthTokenProvider::Error>> {
        debug!(message = "Calling downstream", method = %request.method(), url = %request.url());
        let res = self.client.execute(request).await.map_err(Error::Reqwest)?;
        let res = check_status(res).await?;
        Ok(res)
    }

    async fn parse_json<T>(res: reqwest::Response) -> Result<T, Error<AuthTokenProvider::Error>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        res.json().await.map_err(Error::Reqwest)
    }
}

impl<AuthError> From<Error<AuthError>> for crate::core::Error
where
    AuthError: std::error::Error + Send + Sync + 'static,
{
    fn from(err: Error<AuthError>) -> Self {
        match err {
            Error::Auth(err) => Self::Authorization(err.into()),
            Error::Server(ServerError {
                status_code,
                content_type,
                body,
            }) => Self::Downstream {
                status_code,
                content_type,
                body,
            },
            Error::Reqwest(err) => Self::Transport(err.into()),
        }
    }
}

#[async_trait::async_trait]
impl<AuthTokenProvider> crate::core::CustomerService for Client<AuthTokenProvider>
where
    AuthTokenProvider: auth::TokenProvider,
{
    async fn fetch(&self, id: CustomerId) -> Result<Customer, crate::core::Error> {
        let customer = self.fetch_customer(id).await?;
        Ok(customer)
    }

    async fn create(&self, customer: &Customer) -> Result<Customer, crate::core::Error> {
        let customer = self.create_customer(customer).await?;
        Ok(customer)
    }
}
