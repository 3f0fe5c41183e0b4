use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::response::ApiResponse;

/// A category as seen by the dashboard. Identifiers are opaque strings; both
/// `id` and `_id` are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Request body for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("response carried no data")]
    EmptyPayload,

    #[error("invalid category id {0:?}")]
    InvalidId(String),
}

/// The four category endpoints the dashboard relies on.
#[async_trait]
pub trait CategoryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<CategoryRecord>, ClientError>;
    async fn create(&self, draft: &CategoryDraft) -> Result<CategoryRecord, ClientError>;
    async fn update(&self, id: &str, draft: &CategoryDraft)
    -> Result<CategoryRecord, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: CategoryApi + ?Sized> CategoryApi for std::sync::Arc<T> {
    async fn list(&self) -> Result<Vec<CategoryRecord>, ClientError> {
        (**self).list().await
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<CategoryRecord, ClientError> {
        (**self).create(draft).await
    }

    async fn update(
        &self,
        id: &str,
        draft: &CategoryDraft,
    ) -> Result<CategoryRecord, ClientError> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        (**self).delete(id).await
    }
}

// Bodies come either wrapped in the service envelope or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope(ApiResponse<T>),
    Bare(T),
}

/// [`CategoryApi`] over HTTP. No timeout is configured beyond reqwest's
/// defaults and failed requests are never retried.
#[derive(Debug, Clone)]
pub struct HttpCategoryClient {
    http: Client,
    base: Url,
}

impl HttpCategoryClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        Ok(self.base.join("api/categories")?)
    }

    /// The id always lands as a single percent-encoded path segment.
    fn item_url(&self, id: &str) -> Result<Url, ClientError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(ClientError::InvalidId(id.to_string()));
        }
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidId(id.to_string()))?
            .push(id);
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        match response.json::<Payload<T>>().await? {
            Payload::Envelope(envelope) => envelope.into_data().ok_or(ClientError::EmptyPayload),
            Payload::Bare(data) => Ok(data),
        }
    }
}

#[async_trait]
impl CategoryApi for HttpCategoryClient {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<CategoryRecord>, ClientError> {
        debug!("fetching categories");
        let response = Self::send(self.http.get(self.collection_url()?)).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn create(&self, draft: &CategoryDraft) -> Result<CategoryRecord, ClientError> {
        debug!("creating category");
        let request = self.http.post(self.collection_url()?).json(draft);
        Self::decode(Self::send(request).await?).await
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        id: &str,
        draft: &CategoryDraft,
    ) -> Result<CategoryRecord, ClientError> {
        debug!("updating category");
        let request = self.http.put(self.item_url(id)?).json(draft);
        Self::decode(Self::send(request).await?).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        debug!("deleting category");
        Self::send(self.http.delete(self.item_url(id)?)).await?;
        Ok(())
    }
}
