//! HTTP access to the booking backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::CatalogResponse;
use crate::config::ApiConfig;

const CATALOG_PATH: &str = "/api/kategori-layanans?populate=layanans";
const ORDERS_PATH: &str = "/api/transaksis";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// What the order dialog submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub service_id: String,
    pub customer_id: String,
    pub quantity: u32,
}

#[derive(Serialize)]
struct OrderBody<'a> {
    data: OrderFields<'a>,
}

#[derive(Serialize)]
struct OrderFields<'a> {
    layanan: &'a str,
    pelanggan: &'a str,
    jumlah: u32,
}

/// Backend operations the catalog depends on.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch every category with its services.
    async fn fetch_catalog(&self) -> Result<CatalogResponse, ClientError>;

    /// Create an order for a customer.
    async fn submit_order(&self, order: &OrderDraft) -> Result<(), ClientError>;

    /// Short label for the status bar.
    fn endpoint(&self) -> String;
}

#[derive(Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn catalog_url(&self) -> String {
        format!("{}{CATALOG_PATH}", self.base_url)
    }

    fn orders_url(&self) -> String {
        format!("{}{ORDERS_PATH}", self.base_url)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_catalog(&self) -> Result<CatalogResponse, ClientError> {
        let url = self.catalog_url();
        debug!("Fetching catalog from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<CatalogResponse>()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    async fn submit_order(&self, order: &OrderDraft) -> Result<(), ClientError> {
        let url = self.orders_url();
        let body = OrderBody {
            data: OrderFields {
                layanan: &order.service_id,
                pelanggan: &order.customer_id,
                jumlah: order.quantity,
            },
        };
        debug!(service = %order.service_id, quantity = order.quantity, "Submitting order");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                url,
                status: status.as_u16(),
            })
        }
    }

    fn endpoint(&self) -> String {
        self.base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, host)| host)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpCatalogClient {
        HttpCatalogClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let client = client("https://laundry.example/");
        assert_eq!(
            client.catalog_url(),
            "https://laundry.example/api/kategori-layanans?populate=layanans"
        );
        assert_eq!(client.orders_url(), "https://laundry.example/api/transaksis");
    }

    #[test]
    fn test_endpoint_strips_scheme() {
        assert_eq!(client("http://localhost:1337").endpoint(), "localhost:1337");
    }

    #[test]
    fn test_order_body_uses_backend_field_names() {
        let body = OrderBody {
            data: OrderFields {
                layanan: "svc-1",
                pelanggan: "cust-9",
                jumlah: 3,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": {"layanan": "svc-1", "pelanggan": "cust-9", "jumlah": 3}})
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed on any sane machine.
        let error = client("http://127.0.0.1:9").fetch_catalog().await.unwrap_err();
        assert!(matches!(error, ClientError::Transport { .. }), "{error}");
    }
}
