use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::core::Error;

/// A failed customer call, rendered as the HTTP response the caller sees.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Authorization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Downstream { status_code, .. } => {
                StatusCode::from_u16(*status_code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(message = "Customer call failed", error = %self.0, status = %status);

        match self.0 {
            Error::Downstream {
                content_type: Some(content_type),
                body,
                ..
            } => (status, [(header::CONTENT_TYPE, content_type)], body).into_response(),
            Error::Downstream { body, .. } => (status, body).into_response(),
            err => (status, err.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_failure_is_internal_error() {
        let err = ApiError(Error::Authorization(anyhow::anyhow!("no token")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn transport_failure_is_bad_gateway() {
        let err = ApiError(Error::Transport(anyhow::anyhow!("connection refused")));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn downstream_status_is_kept() {
        let err = ApiError(Error::Downstream {
            status_code: 409,
            content_type: Some("application/json".into()),
            body: r#"{"error":"conflict"}"#.into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn downstream_body_without_content_type_is_text() {
        let res = ApiError(Error::Downstream {
            status_code: 404,
            content_type: None,
            body: "not found".into(),
        })
        .into_response();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
