//! Inbound HTTP surface.

mod error;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::core::{Core, Customer, CustomerId};

pub use self::error::ApiError;

pub fn routes(core: Arc<Core>) -> Router {
    Router::new()
        .route("/customers/:id", get(get_customer))
        .route("/customers", post(create_customer))
        .with_state(core)
}

async fn get_customer(
    State(core): State<Arc<Core>>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>, ApiError> {
    let customer = core.customers().fetch(id).await?;
    Ok(Json(customer))
}

/// Answers `200 OK` with the created record even when the downstream service
/// replied `201 Created`; only failures carry the downstream status.
async fn create_customer(
    State(core): State<Arc<Core>>,
    Json(customer): Json<Customer>,
) -> Result<Json<Customer>, ApiError> {
    let customer = core.customers().create(&customer).await?;
    Ok(Json(customer))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::http::StatusCode;

    use super::*;
    use crate::core::{CustomerService, Error};

    #[derive(Default)]
    struct Recorder {
        created: Mutex<Vec<Customer>>,
    }

    #[async_trait::async_trait]
    impl CustomerService for Recorder {
        async fn fetch(&self, id: CustomerId) -> Result<Customer, Error> {
            if id == 404 {
                return Err(Error::Downstream {
                    status_code: 404,
                    content_type: None,
                    body: String::new(),
                });
            }
            let mut customer = Customer::default();
            customer.0.insert("id".into(), id.into());
            Ok(customer)
        }

        async fn create(&self, customer: &Customer) -> Result<Customer, Error> {
            self.created.lock().unwrap().push(customer.clone());
            Ok(customer.clone())
        }
    }

    fn core() -> Arc<Core> {
        Arc::new(Core {
            customers: Box::new(Recorder::default()),
        })
    }

    #[tokio::test]
    async fn get_customer_returns_downstream_record() {
        let Json(customer) = get_customer(State(core()), Path(7)).await.unwrap();

        assert_eq!(customer.id(), Some(&serde_json::json!(7)));
    }

    #[tokio::test]
    async fn get_customer_reflects_downstream_failure() {
        let err = get_customer(State(core()), Path(404)).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_customer_forwards_payload() {
        let payload: Customer = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();

        let Json(created) = create_customer(State(core()), Json(payload.clone()))
            .await
            .unwrap();

        assert_eq!(created, payload);
    }
}
