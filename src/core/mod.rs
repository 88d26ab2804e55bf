use serde::{Deserialize, Serialize};

pub type CustomerId = i64;

/// A customer record as the downstream service defines it.
///
/// The record is an opaque JSON object: no field, `id` included, is typed or checked,
/// and key order is kept so a record goes back out as it came in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customer(pub serde_json::Map<String, serde_json::Value>);

impl Customer {
    /// The `id` field, whatever its JSON type.
    pub fn id(&self) -> Option<&serde_json::Value> {
        self.0.get("id")
    }
}

pub struct Core {
    pub customers: Box<dyn CustomerService>,
}

impl Core {
    pub fn customers(&self) -> &dyn CustomerService {
        self.customers.as_ref()
    }
}

#[async_trait::async_trait]
pub trait CustomerService: Send + Sync {
    async fn fetch(&self, id: CustomerId) -> Result<Customer, Error>;
    async fn create(&self, customer: &Customer) -> Result<Customer, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authorization: {0}")]
    Authorization(#[source] anyhow::Error),
    #[error("downstream responded with {status_code} status code")]
    Downstream {
        status_code: u16,
        content_type: Option<String>,
        body: String,
    },
    #[error("transport: {0}")]
    Transport(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(raw: &str) -> String {
        let customer: Customer = serde_json::from_str(raw).unwrap();
        serde_json::to_string(&customer).unwrap()
    }

    #[test]
    fn customer_keeps_unknown_fields() {
        let raw = r#"{"id":7,"name":"Ada","tags":["vip"],"address":{"city":"London"}}"#;
        let customer: Customer = serde_json::from_str(raw).unwrap();

        assert_eq!(customer.id(), Some(&serde_json::json!(7)));
        assert_eq!(customer.0["name"], "Ada");
        assert_eq!(relay(raw), raw);
    }

    #[test]
    fn customer_id_of_any_type_survives() {
        for raw in [
            r#"{"id":"c-7","name":"Ada"}"#,
            r#"{"id":null,"name":"Ada"}"#,
            r#"{"id":18446744073709551615}"#,
            r#"{"id":7.5}"#,
            r#"{"name":"Grace","id":"0b7e0d5c-6a43-4c8e-9d1f-3f0c1a2b4c5d"}"#,
        ] {
            assert_eq!(relay(raw), raw);
        }
    }

    #[test]
    fn customer_without_id() {
        let customer: Customer = serde_json::from_str(r#"{"name":"Grace"}"#).unwrap();

        assert_eq!(customer.id(), None);
        assert_eq!(serde_json::to_string(&customer).unwrap(), r#"{"name":"Grace"}"#);
    }

    #[test]
    fn customer_must_be_an_object() {
        assert!(serde_json::from_str::<Customer>(r#"[1,2]"#).is_err());
    }
}
