//! Observation log models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zoo_ops_ai::MonitoringSummary;

use super::{wire, Collection, HealthStatus, Resource};

/// A daily log entry submitted by a keeper, enriched with AI summary fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub animal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_string", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<HealthStatus>,
    #[serde(default, deserialize_with = "wire::opt_number", skip_serializing_if = "Option::is_none")]
    pub mood_percentage: Option<f64>,
    #[serde(default, deserialize_with = "wire::opt_number", skip_serializing_if = "Option::is_none")]
    pub appetite_percentage: Option<f64>,
    #[serde(default, deserialize_with = "wire::opt_number", skip_serializing_if = "Option::is_none")]
    pub movement_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injuries_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_observation_text: Option<String>,
    /// Combined text sent for summarisation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_image_url: Option<String>,
    /// User ids this log was shared with
    #[serde(default)]
    pub shared_with: Vec<String>,
    /// Summary fields and anything else the server attached
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Observation {
    const COLLECTION: Collection = Collection::Observations;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Observation {
    pub fn has_media(&self) -> bool {
        self.image_url.is_some() || self.video_url.is_some()
    }

    pub fn is_shared_with(&self, user_id: &str) -> bool {
        self.shared_with.iter().any(|u| u == user_id)
    }

    /// Structured summary, whether stored nested under `aiSummary` or
    /// merged into the observation itself.
    pub fn summary(&self) -> Option<MonitoringSummary> {
        if let Some(nested) = self.extra.get("aiSummary") {
            if let Ok(summary) = serde_json::from_value(nested.clone()) {
                return Some(summary);
            }
        }
        serde_json::from_value(Value::Object(self.extra.clone())).ok()
    }

    /// Short human text for log lists.
    pub fn note(&self) -> String {
        non_blank(self.general_observation_text.as_deref())
            .or_else(|| non_blank(self.injuries_text.as_deref()))
            .unwrap_or("Media log submitted.")
            .to_string()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
