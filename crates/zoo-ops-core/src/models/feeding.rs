//! Feeding record models.

use serde::{Deserialize, Serialize};

use super::{require, wire, Collection, Resource, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedingStatus {
    Completed,
    #[default]
    Pending,
}

impl FeedingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedingStatus::Completed => "completed",
            FeedingStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for FeedingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled or completed feeding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedingRecord {
    pub id: String,
    pub animal_id: String,
    pub feed_type: String,
    /// Amount label (e.g. "15 kg")
    #[serde(default, deserialize_with = "wire::opt_string", skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Cost in rupees
    #[serde(default, deserialize_with = "wire::number")]
    pub cost: f64,
    #[serde(default)]
    pub status: FeedingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
}

impl Resource for FeedingRecord {
    const COLLECTION: Collection = Collection::FeedingRecords;

    fn id(&self) -> &str {
        &self.id
    }
}

/// New feeding record form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedingDraft {
    pub animal_id: String,
    pub feed_type: String,
    pub amount: String,
    pub cost: f64,
    pub status: FeedingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
}

impl Validate for FeedingDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("animalId", &self.animal_id)?;
        require("feedType", &self.feed_type)?;
        require("amount", &self.amount)?;
        if !self.cost.is_finite() {
            return Err(ValidationError { field: "cost" });
        }
        Ok(())
    }
}

/// Partial update for a feeding record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FeedingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_record() {
        let record: FeedingRecord = serde_json::from_value(serde_json::json!({
            "id": "f1", "animalId": "A001", "feedType": "Meat", "amount": "15 kg",
            "cost": 450, "status": "completed", "recordedBy": "Vikram Singh"
        }))
        .unwrap();
        assert_eq!(record.cost, 450.0);
        assert_eq!(record.status, FeedingStatus::Completed);
    }

    #[test]
    fn test_draft_rejects_nan_cost() {
        let draft = FeedingDraft {
            animal_id: "A001".into(),
            feed_type: "Meat".into(),
            amount: "5 kg".into(),
            cost: f64::NAN,
            ..Default::default()
        };
        assert_eq!(draft.validate().unwrap_err().field, "cost");
    }
}
