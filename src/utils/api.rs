use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use url::Url;
use crate::config::ConnectionConfig;
use crate::error::ApiError;
use crate::models::{GradeRecord, GradeUpdate, NewGrade, RecordId};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The remote grades collection. Every call takes the connection settings in
/// force for that operation.
#[async_trait]
pub trait GradesApi: Send + Sync {
    async fn list(&self, config: &ConnectionConfig) -> Result<Vec<GradeRecord>, ApiError>;

    async fn get(&self, config: &ConnectionConfig, id: &RecordId) -> Result<GradeRecord, ApiError>;

    async fn create(&self, config: &ConnectionConfig, grade: &NewGrade) -> Result<(), ApiError>;

    async fn update(
        &self,
        config: &ConnectionConfig,
        id: &RecordId,
        changes: &GradeUpdate,
    ) -> Result<(), ApiError>;

    async fn delete(&self, config: &ConnectionConfig, id: &RecordId) -> Result<(), ApiError>;
}

/// `GradesApi` over HTTP+JSON.
#[derive(Debug, Clone)]
pub struct HttpGradesApi {
    client: Client,
}

impl HttpGradesApi {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build the client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        HttpGradesApi { client }
    }

    fn request(&self, method: Method, url: Url, config: &ConnectionConfig) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match config.api_key() {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    // Sends the request; a non-2xx answer becomes `ApiError::Status` with the
    // first string found under `detail_fields` in the body.
    async fn send(&self, builder: RequestBuilder, detail_fields: &[&str]) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body, detail_fields),
        })
    }
}

#[async_trait]
impl GradesApi for HttpGradesApi {
    async fn list(&self, config: &ConnectionConfig) -> Result<Vec<GradeRecord>, ApiError> {
        let url = collection_url(config)?;
        let response = self.send(self.request(Method::GET, url, config), &[]).await?;
        decode(response).await
    }

    async fn get(&self, config: &ConnectionConfig, id: &RecordId) -> Result<GradeRecord, ApiError> {
        let url = item_url(config, id)?;
        let response = self.send(self.request(Method::GET, url, config), &["error"]).await?;
        decode(response).await
    }

    async fn create(&self, config: &ConnectionConfig, grade: &NewGrade) -> Result<(), ApiError> {
        let url = collection_url(config)?;
        let builder = self.request(Method::POST, url, config).json(grade);
        self.send(builder, &["details"]).await?;
        Ok(())
    }

    async fn update(
        &self,
        config: &ConnectionConfig,
        id: &RecordId,
        changes: &GradeUpdate,
    ) -> Result<(), ApiError> {
        let url = item_url(config, id)?;
        let builder = self.request(Method::PUT, url, config).json(changes);
        self.send(builder, &["details", "error"]).await?;
        Ok(())
    }

    async fn delete(&self, config: &ConnectionConfig, id: &RecordId) -> Result<(), ApiError> {
        let url = item_url(config, id)?;
        self.send(self.request(Method::DELETE, url, config), &["error"]).await?;
        Ok(())
    }
}

fn collection_url(config: &ConnectionConfig) -> Result<Url, ApiError> {
    Url::parse(config.endpoint()).map_err(|e| ApiError::InvalidUrl(format!("{} ({})", config.endpoint(), e)))
}

/// `{endpoint}/{id}`, with the id encoded as a single path segment.
fn item_url(config: &ConnectionConfig, id: &RecordId) -> Result<Url, ApiError> {
    if id.is_blank() {
        return Err(ApiError::EmptyId);
    }
    let mut url = collection_url(config)?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(config.endpoint().to_string()))?
        .pop_if_empty()
        .push(id.as_str());
    Ok(url)
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Best message for a failed response: the first non-empty string under one of
/// `fields`, otherwise a generic status line.
pub fn error_message(status: u16, body: &str, fields: &[&str]) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    fields
        .iter()
        .filter_map(|field| parsed.as_ref()?.get(*field)?.as_str())
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Error HTTP: {}", status))
}
