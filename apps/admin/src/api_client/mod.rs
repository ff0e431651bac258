/// API client — the single point of entry for every call to the portfolio backend.
///
/// No other module talks HTTP. The controller and the resume uploader only
/// see the `PortfolioApi` trait, so tests can drive them with an in-memory
/// backend instead of a live service.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Resource, ResumeInfo};

#[cfg(test)]
pub mod testing;

/// Multipart field the backend reads the uploaded resume from.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Operations the admin UI performs against the backend.
///
/// `create` succeeds on any 2xx status and hands back the reply as raw JSON;
/// its shape is the backend's business.
/// `delete` reports success as a boolean: `true` only for `204 No Content`.
/// Any other status is `Ok(false)`, never an error; callers must check it.
#[async_trait]
pub trait PortfolioApi: Send + Sync {
    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError>;

    async fn create<R: Resource>(&self, draft: &R) -> Result<Value, ApiError>;

    async fn delete<R: Resource>(&self, id: &str) -> Result<bool, ApiError>;

    async fn current_resume(&self) -> Result<Option<ResumeInfo>, ApiError>;

    async fn upload_resume(&self, file_name: &str, contents: Bytes) -> Result<Value, ApiError>;

    async fn delete_resume(&self) -> Result<Value, ApiError>;

    async fn download_resume(&self) -> Result<Bytes, ApiError>;

    fn resume_download_url(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// reqwest-backed client bound to one immutable base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// URL of one record. The id is pushed as a single path segment, so
    /// `/`, `?` and `#` in it are percent-encoded.
    fn record_url(&self, collection: &str, id: &str) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Ok(url)
    }

    /// Reads the body, turning non-2xx statuses into `ApiError::Api`
    /// with the backend's `message` when it sent one.
    async fn read_body(response: Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Backend returned {}: {}", status, body);
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like `read_json` into a `Value`, but an empty 2xx body is `Null`.
    async fn read_reply(response: Response) -> Result<Value, ApiError> {
        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PortfolioApi for ApiClient {
    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let url = self.url(R::COLLECTION);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::read_json(response).await
    }

    async fn create<R: Resource>(&self, draft: &R) -> Result<Value, ApiError> {
        let url = self.url(R::COLLECTION);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await?;
        Self::read_reply(response).await
    }

    async fn delete<R: Resource>(&self, id: &str) -> Result<bool, ApiError> {
        let url = self.record_url(R::COLLECTION, id)?;
        debug!("DELETE {url}");
        let response = self.client.delete(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            warn!("DELETE {url} returned {status}");
        }
        Ok(status == StatusCode::NO_CONTENT)
    }

    async fn current_resume(&self) -> Result<Option<ResumeInfo>, ApiError> {
        let url = self.url("resume/current");
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let info: ResumeInfo = Self::read_json(response).await?;
        Ok(info.is_present().then_some(info))
    }

    async fn upload_resume(&self, file_name: &str, contents: Bytes) -> Result<Value, ApiError> {
        let url = self.url("resume/upload");
        debug!("POST {url} ({} bytes)", contents.len());
        let part = multipart::Part::bytes(contents.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = multipart::Form::new().part(RESUME_FIELD, part);
        let response = self.client.post(&url).multipart(form).send().await?;
        Self::read_reply(response).await
    }

    async fn delete_resume(&self) -> Result<Value, ApiError> {
        let url = self.url("resume/current");
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        Self::read_reply(response).await
    }

    async fn download_resume(&self) -> Result<Bytes, ApiError> {
        let url = self.resume_download_url();
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.bytes().await?)
    }

    fn resume_download_url(&self) -> String {
        self.url("resume/download")
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}
