//! Alert models.

use serde::{Deserialize, Serialize};

use super::{require, Collection, Resource, Validate, ValidationError};

/// An SOS or health alert raised by staff or the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    /// Alert type ("sos", "health", ...)
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Resource for Alert {
    const COLLECTION: Collection = Collection::Alerts;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Alert {
    /// Alerts without a status are treated as active.
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "active")
    }

    pub fn is_sos(&self) -> bool {
        self.kind == "sos"
    }
}

/// New alert form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Validate for AlertDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("type", &self.kind)?;
        require("message", &self.message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_renamed() {
        let draft = AlertDraft {
            kind: "sos".into(),
            message: "Lion showing distress".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], "sos");
        assert!(value.get("animalName").is_none());
    }

    #[test]
    fn test_status_defaults_active() {
        let alert: Alert = serde_json::from_value(serde_json::json!({
            "id": "al1", "type": "health", "message": "Check due"
        }))
        .unwrap();
        assert!(alert.is_active());
        assert!(!alert.is_sos());
    }
}
