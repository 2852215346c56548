//! Medication and treatment models.

use serde::{Deserialize, Serialize};

use super::{require, Collection, Resource, Validate, ValidationError};

/// Medication course status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    #[default]
    Active,
    Completed,
    Discontinued,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Active => "active",
            MedicationStatus::Completed => "completed",
            MedicationStatus::Discontinued => "discontinued",
        }
    }

    /// Completed and discontinued courses are history.
    pub fn is_finished(&self) -> bool {
        !matches!(self, MedicationStatus::Active)
    }
}

impl std::fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MedicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(MedicationStatus::Active),
            "completed" => Ok(MedicationStatus::Completed),
            "discontinued" => Ok(MedicationStatus::Discontinued),
            other => Err(format!("unknown medication status: {}", other)),
        }
    }
}

/// One recorded dose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationEntry {
    pub id: String,
    pub administered_by: String,
    pub administered_at: String,
    #[serde(default)]
    pub notes: String,
}

impl AdministrationEntry {
    pub fn new(administered_by: &str, notes: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            administered_by: administered_by.to_string(),
            administered_at: chrono::Utc::now().to_rfc3339(),
            notes: notes.trim().to_string(),
        }
    }
}

/// A prescribed medication course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub animal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_name: Option<String>,
    pub medication_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: MedicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Append-only dose history
    #[serde(default)]
    pub administration_log: Vec<AdministrationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Medication {
    const COLLECTION: Collection = Collection::Medications;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Medication {
    pub fn administration_count(&self) -> usize {
        self.administration_log.len()
    }
}

/// Form state for prescribing a medication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDraft {
    pub animal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_name: Option<String>,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<String>,
    pub status: MedicationStatus,
    pub administration_log: Vec<AdministrationEntry>,
}

impl Validate for MedicationDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("animalId", &self.animal_id)?;
        require("medicationName", &self.medication_name)?;
        require("dosage", &self.dosage)?;
        require("frequency", &self.frequency)?;
        require("startDate", &self.start_date)?;
        require("endDate", &self.end_date)?;
        Ok(())
    }
}

/// Partial update for a medication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MedicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration_log: Option<Vec<AdministrationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of a finished treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentOutcome {
    #[serde(rename = "Fully recovered")]
    FullyRecovered,
    #[serde(rename = "Improved")]
    Improved,
    #[serde(rename = "Ongoing treatment")]
    OngoingTreatment,
    #[serde(rename = "No improvement")]
    NoImprovement,
    #[serde(rename = "Deceased")]
    Deceased,
}

impl TreatmentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentOutcome::FullyRecovered => "Fully recovered",
            TreatmentOutcome::Improved => "Improved",
            TreatmentOutcome::OngoingTreatment => "Ongoing treatment",
            TreatmentOutcome::NoImprovement => "No improvement",
            TreatmentOutcome::Deceased => "Deceased",
        }
    }
}

impl std::fmt::Display for TreatmentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TreatmentOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fully recovered" | "recovered" => Ok(TreatmentOutcome::FullyRecovered),
            "improved" => Ok(TreatmentOutcome::Improved),
            "ongoing treatment" | "ongoing" => Ok(TreatmentOutcome::OngoingTreatment),
            "no improvement" => Ok(TreatmentOutcome::NoImprovement),
            "deceased" => Ok(TreatmentOutcome::Deceased),
            other => Err(format!("unknown treatment outcome: {}", other)),
        }
    }
}

/// Outcome of a completed treatment, kept on the client only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecord {
    pub id: String,
    pub animal_id: String,
    pub treatment_name: String,
    pub start_date: String,
    pub end_date: String,
    pub outcome: TreatmentOutcome,
    pub notes: String,
    pub prescribed_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_medication() {
        let med: Medication = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "animalId": "A003",
            "medicationName": "Pain Relief - Ibuprofen",
            "dosage": "200mg",
            "frequency": "As needed for limp",
            "startDate": "2024-03-01",
            "endDate": "2024-03-08",
            "prescribedBy": "Dr. Anjali Verma",
            "status": "active",
            "administrationLog": []
        }))
        .unwrap();
        assert_eq!(med.status, MedicationStatus::Active);
        assert_eq!(med.administration_count(), 0);
        assert!(!med.status.is_finished());
    }

    #[test]
    fn test_draft_requires_dates() {
        let draft = MedicationDraft {
            animal_id: "A003".into(),
            medication_name: "Ibuprofen".into(),
            dosage: "200mg".into(),
            frequency: "daily".into(),
            start_date: "2024-03-01".into(),
            ..Default::default()
        };
        assert_eq!(draft.validate().unwrap_err().field, "endDate");
    }

    #[test]
    fn test_administration_entry() {
        let entry = AdministrationEntry::new("Dr. Anjali Verma", "  after meal ");
        assert_eq!(entry.notes, "after meal");
        assert_eq!(entry.id.len(), 36);
    }
}
