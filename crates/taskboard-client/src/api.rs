use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskboard_types::{Entity, ErrorBody};
use tracing::debug;

use crate::error::ClientError;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    pub server: String,
    pub timestamp: String,
    pub data: HealthCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HealthCounts {
    pub tasks: usize,
    pub projects: usize,
}

/// HTTP client for one taskboard server.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    /// Client for the server rooted at `base_url`, e.g. `http://localhost:5000`
    /// or `https://example.test/api`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("taskboard-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(base_url, http)
    }

    /// Use a preconfigured `reqwest` client (proxies, timeouts, cookies).
    pub fn with_client(base_url: &str, http: Client) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        let url = self.url(&[E::COLLECTION])?;
        debug!(%url, "GET");
        decode(self.http.get(url).send().await?).await
    }

    pub async fn get<E: Entity>(&self, id: &str) -> Result<E, ClientError> {
        let url = self.url(&[E::COLLECTION, id])?;
        debug!(%url, "GET");
        decode(self.http.get(url).send().await?).await
    }

    pub async fn create<E: Entity>(&self, draft: &(impl Serialize + ?Sized)) -> Result<E, ClientError> {
        let url = self.url(&[E::COLLECTION])?;
        debug!(%url, "POST");
        decode(self.http.post(url).json(draft).send().await?).await
    }

    pub async fn update<E: Entity>(&self, id: &str, patch: &(impl Serialize + ?Sized)) -> Result<E, ClientError> {
        let url = self.url(&[E::COLLECTION, id])?;
        debug!(%url, "PUT");
        decode(self.http.put(url).json(patch).send().await?).await
    }

    /// Delete a record; the server answers with the removed record.
    pub async fn remove<E: Entity>(&self, id: &str) -> Result<E, ClientError> {
        let url = self.url(&[E::COLLECTION, id])?;
        debug!(%url, "DELETE");
        decode(self.http.delete(url).send().await?).await
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        let url = self.url(&["health"])?;
        decode(self.http.get(url).send().await?).await
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response.json::<ErrorBody>().await.ok().map(|body| body.message);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
