//! Access to the stored collection: over HTTP or in-process

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use qr_core::{CollectionStore, QrError, Result};

/// Path of the collection endpoint below the API base URL
pub const COLLECTION_PATH: &str = "/api/qr-codes";

/// The two operations of the collection API. Records travel as raw JSON so
/// fields a client does not understand survive its writes.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// Fetch the whole collection
    async fn list_entries(&self) -> Result<Vec<Value>>;

    /// Overwrite the whole collection
    async fn replace_all(&self, entries: &[Value], secret: &str) -> Result<()>;
}

#[async_trait]
impl CollectionApi for CollectionStore {
    async fn list_entries(&self) -> Result<Vec<Value>> {
        CollectionStore::list_entries(self).await
    }

    async fn replace_all(&self, entries: &[Value], secret: &str) -> Result<()> {
        CollectionStore::replace_all(self, entries, secret).await
    }
}

#[async_trait]
impl<T: CollectionApi + ?Sized> CollectionApi for Arc<T> {
    async fn list_entries(&self) -> Result<Vec<Value>> {
        (**self).list_entries().await
    }

    async fn replace_all(&self, entries: &[Value], secret: &str) -> Result<()> {
        (**self).replace_all(entries, secret).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceBody<'a> {
    qr_codes: &'a [Value],
    security_code: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Collection API over HTTP
pub struct HttpCollectionClient {
    client: Client,
    endpoint: String,
}

impl HttpCollectionClient {
    /// Create a client for the server at `api_url`
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QrError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), COLLECTION_PATH),
        })
    }

    /// Get the collection endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Turn a non-OK response into an error
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(QrError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorBody {
                error: Some(error), ..
            }) => error,
            _ => text,
        };

        error!("Request failed with status {}: {}", status, message);
        Err(QrError::RequestFailed {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CollectionApi for HttpCollectionClient {
    async fn list_entries(&self) -> Result<Vec<Value>> {
        debug!("GET {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| QrError::StorageUnavailable(format!("HTTP request failed: {}", e)))?;

        Self::check(response)
            .await?
            .json::<Vec<Value>>()
            .await
            .map_err(|e| QrError::CorruptCollection(format!("Failed to read response: {}", e)))
    }

    async fn replace_all(&self, entries: &[Value], secret: &str) -> Result<()> {
        debug!("POST {} ({} entries)", self.endpoint, entries.len());

        let body = ReplaceBody {
            qr_codes: entries,
            security_code: secret,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| QrError::StorageUnavailable(format!("HTTP request failed: {}", e)))?;

        Self::check(response).await?;
        Ok(())
    }
}
