use tracing::debug;

#[derive(Debug, thiserror::Error)]
#[error("{status_code} status code")]
pub struct ServerError {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Passes successful responses through; anything else is drained into a [`ServerError`].
pub async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, ServerError> {
    let status = res.status();
    if !status.is_success() {
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = match res.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(message = "Unable to read error body", status = %status, error = %err);
                String::new()
            }
        };
        return Err(ServerError {
            status_code: status.as_u16(),
            content_type,
            body,
        });
    }
    Ok(res)
}
