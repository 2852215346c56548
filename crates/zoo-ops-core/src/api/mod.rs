//! Zoo REST API access.
//!
//! [`ZooApi`] is the seam between screens and the network. [`HttpZooApi`]
//! talks to the real service; [`InMemoryZooApi`] reproduces the service's
//! behaviour in-process for tests and offline demos.

mod client;
mod memory;

pub use client::*;
pub use memory::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use zoo_ops_ai::MonitoringSummary;

use crate::models::{Collection, HealthStatus};

/// API errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response payload: {0}")]
    Payload(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Payload(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Guess the content type from the file extension.
    pub fn from_path_bytes(file_name: &str, bytes: Vec<u8>) -> Self {
        let ext = file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let content_type = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "mp4" => "video/mp4",
            "webm" => "video/webm",
            "mov" => "video/quicktime",
            "wav" => "audio/wav",
            "mp3" => "audio/mpeg",
            "ogg" => "audio/ogg",
            _ => "application/octet-stream",
        };
        Self::new(file_name, content_type, bytes)
    }
}

/// JSON body of a daily log submission (`logData` form field).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPayload {
    pub animal_id: String,
    pub submitted_by: String,
    pub created_at: String,
    pub health_status: HealthStatus,
    pub mood_percentage: u8,
    pub appetite_percentage: u8,
    pub movement_percentage: u8,
    pub injuries_text: String,
    pub general_observation_text: String,
    /// Combined text used for summarisation
    pub observation_text: String,
    pub shared_with: Vec<String>,
}

/// Multipart submission of a daily log.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSubmission {
    pub log_data: ObservationPayload,
    pub gate_image: Option<Upload>,
    pub animal_image: Option<Upload>,
    pub animal_video: Option<Upload>,
}

/// Multipart request turning a voice recording into a monitoring summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioObservation {
    pub audio: Upload,
    /// ISO timestamp of the recording
    pub date: String,
    /// Slider readings rendered as text, prepended to the transcript
    pub prefix: String,
    pub animal_id: String,
}

/// Operations offered by the zoo API.
#[async_trait]
pub trait ZooApi: Send + Sync {
    /// GET `/{collection}`.
    async fn list(&self, collection: Collection) -> ApiResult<Vec<Value>>;

    /// POST `/{collection}`; returns the server's representation.
    async fn create(&self, collection: Collection, body: Value) -> ApiResult<Value>;

    /// PUT `/{collection}/{id}` with a partial patch.
    async fn update(&self, collection: Collection, id: &str, patch: Value) -> ApiResult<Value>;

    /// DELETE `/{collection}/{id}`.
    async fn delete(&self, collection: Collection, id: &str) -> ApiResult<()>;

    /// POST `/process_text_observation`; returns the stored observation.
    async fn process_text_observation(&self, submission: ObservationSubmission) -> ApiResult<Value>;

    /// POST `/process_audio_observation`.
    async fn process_audio_observation(&self, request: AudioObservation) -> ApiResult<MonitoringSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_content_type() {
        assert_eq!(Upload::from_path_bytes("gate.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(Upload::from_path_bytes("clip.mp4", vec![]).content_type, "video/mp4");
        assert_eq!(
            Upload::from_path_bytes("noext", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = ObservationPayload {
            animal_id: "A001".into(),
            submitted_by: "Rajesh Kumar".into(),
            created_at: "2024-03-01T08:00:00Z".into(),
            health_status: HealthStatus::Good,
            mood_percentage: 50,
            appetite_percentage: 50,
            movement_percentage: 50,
            injuries_text: String::new(),
            general_observation_text: "Calm".into(),
            observation_text: "General Observation: Calm. ".into(),
            shared_with: vec!["u3".into()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["animalId"], "A001");
        assert_eq!(value["moodPercentage"], 50);
        assert_eq!(value["sharedWith"][0], "u3");
    }
}
