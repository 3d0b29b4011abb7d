//! JSON-over-HTTP implementation of [`SupplierService`].

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ConsumerGroupId, Supplier, SupplierId},
    error::{ApiError, ApiException},
    protocol::{ListSuppliersQuery, SupplierPayload},
};
use url::Url;

use crate::SupplierService;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpSupplierService {
    http: Client,
    base_url: String,
}

impl HttpSupplierService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url.trim())
            .with_context(|| format!("invalid supplier service url '{base_url}'"))?;
        if parsed.cannot_be_a_base() {
            return Err(anyhow!("supplier service url '{base_url}' cannot be a base url"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn suppliers_url(&self) -> String {
        format!("{}/suppliers", self.base_url)
    }

    fn supplier_url(&self, id: SupplierId) -> String {
        format!("{}/suppliers/{id}", self.base_url)
    }
}

#[async_trait]
impl SupplierService for HttpSupplierService {
    async fn list(&self, group: ConsumerGroupId) -> Result<Vec<Supplier>> {
        let response = self
            .http
            .get(self.suppliers_url())
            .query(&ListSuppliersQuery {
                consumer_group_id: group,
            })
            .send()
            .await?;
        read_json(response).await
    }

    async fn create(&self, payload: &SupplierPayload) -> Result<Supplier> {
        let response = self
            .http
            .post(self.suppliers_url())
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update(&self, id: SupplierId, payload: &SupplierPayload) -> Result<Supplier> {
        let response = self
            .http
            .put(self.supplier_url(id))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn toggle_active(&self, id: SupplierId) -> Result<Supplier> {
        let response = self
            .http
            .patch(format!("{}/toggle-active", self.supplier_url(id)))
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete(&self, id: SupplierId) -> Result<()> {
        let response = self.http.delete(self.supplier_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .context("malformed supplier service response")
}

/// Turns a non-2xx response into an error, preferring the service's
/// [`ApiError`] body when it sent one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(ApiException::from(api_error).into()),
        Err(_) if body.trim().is_empty() => Err(anyhow!("supplier service returned {status}")),
        Err(_) => Err(anyhow!("supplier service returned {status}: {}", body.trim())),
    }
}
