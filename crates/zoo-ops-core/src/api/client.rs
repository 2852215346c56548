//! HTTP client for the zoo REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use zoo_ops_ai::MonitoringSummary;

use super::{ApiError, ApiResult, AudioObservation, ObservationSubmission, Upload, ZooApi};
use crate::models::Collection;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of a locally running backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// [`ZooApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpZooApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpZooApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Parse an HTTP response, surfacing the server's `error` message.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.or(e.message))
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Payload(format!("{} - {}", e, body.chars().take(200).collect::<String>())))
    }

    fn file_part(upload: Upload) -> ApiResult<Part> {
        Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(ApiError::from)
    }
}

#[async_trait]
impl ZooApi for HttpZooApi {
    async fn list(&self, collection: Collection) -> ApiResult<Vec<Value>> {
        let url = self.url(collection.path());
        debug!("[ZooApi] GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    async fn create(&self, collection: Collection, body: Value) -> ApiResult<Value> {
        let url = self.url(collection.path());
        debug!("[ZooApi] POST {}", url);
        let response = self.client.post(&url).json(&body).send().await?;
        Self::parse_response(response).await
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> ApiResult<Value> {
        let url = self.url(&format!("{}/{}", collection.path(), id));
        debug!("[ZooApi] PUT {}", url);
        let response = self.client.put(&url).json(&patch).send().await?;
        Self::parse_response(response).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> ApiResult<()> {
        let url = self.url(&format!("{}/{}", collection.path(), id));
        debug!("[ZooApi] DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        let _: Value = Self::parse_response(response).await?;
        Ok(())
    }

    async fn process_text_observation(&self, submission: ObservationSubmission) -> ApiResult<Value> {
        let url = self.url("process_text_observation");
        debug!(
            "[ZooApi] POST {} (animal {}, {} recipients)",
            url,
            submission.log_data.animal_id,
            submission.log_data.shared_with.len()
        );

        let mut form = Form::new().text("logData", serde_json::to_string(&submission.log_data)?);
        if let Some(file) = submission.gate_image {
            form = form.part("gateImage", Self::file_part(file)?);
        }
        if let Some(file) = submission.animal_image {
            form = form.part("animalImage", Self::file_part(file)?);
        }
        if let Some(file) = submission.animal_video {
            form = form.part("animalVideo", Self::file_part(file)?);
        }

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::parse_response(response).await
    }

    async fn process_audio_observation(&self, request: AudioObservation) -> ApiResult<MonitoringSummary> {
        let url = self.url("process_audio_observation");
        debug!("[ZooApi] POST {} ({} bytes)", url, request.audio.bytes.len());

        let form = Form::new()
            .part("audio", Self::file_part(request.audio)?)
            .text("date", request.date)
            .text("prefix", request.prefix)
            .text("animalId", request.animal_id);

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::parse_response(response).await
    }
}
