//! Animal models.

use serde::{Deserialize, Serialize};

use super::{require, wire, Collection, Resource, Validate, ValidationError};

/// Overall health of an animal, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Poor,
    Fair,
    #[default]
    Good,
    Excellent,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Excellent,
        HealthStatus::Good,
        HealthStatus::Fair,
        HealthStatus::Poor,
    ];

    /// Fair and poor animals show up in veterinary health reports.
    pub fn needs_attention(&self) -> bool {
        matches!(self, HealthStatus::Fair | HealthStatus::Poor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::Poor => "poor",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(HealthStatus::Excellent),
            "good" => Ok(HealthStatus::Good),
            "fair" => Ok(HealthStatus::Fair),
            "poor" => Ok(HealthStatus::Poor),
            other => Err(format!("unknown health status: {}", other)),
        }
    }
}

/// An animal in the zoo's care.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    /// Server id (e.g. "A001")
    pub id: String,
    /// Zero-padded display number (e.g. "001")
    #[serde(default, deserialize_with = "wire::opt_string", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub name: String,
    pub species: String,
    /// Free-form age label (e.g. "5 years")
    #[serde(default, deserialize_with = "wire::opt_string", skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default)]
    pub health: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appetite: Option<String>,
    /// Name of the responsible keeper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosure: Option<String>,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

impl Resource for Animal {
    const COLLECTION: Collection = Collection::Animals;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Animal {
    /// Case-insensitive match on name or species, or substring match on id.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q)
            || self.species.to_lowercase().contains(&q)
            || self.id.to_lowercase().contains(&q)
    }

    pub fn is_assigned_to(&self, keeper: &str) -> bool {
        self.assigned_to.as_deref() == Some(keeper)
    }
}

/// Placeholder photo for animals added without one.
pub const DEFAULT_ANIMAL_IMAGE: &str =
    "https://images.unsplash.com/photo-1546182990-dffeafbe841d?w=400";

/// Form state for registering a new animal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDraft {
    pub name: String,
    pub species: String,
    pub age: String,
    pub enclosure: String,
    pub assigned_to: String,
    pub health: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Validate for AnimalDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("species", &self.species)?;
        require("age", &self.age)?;
        require("enclosure", &self.enclosure)?;
        require("assignedTo", &self.assigned_to)?;
        Ok(())
    }
}

/// Partial update for an animal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appetite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simba() -> Animal {
        serde_json::from_value(serde_json::json!({
            "id": "A001", "number": "001", "name": "Simba", "species": "Lion",
            "age": "5 years", "enclosure": "A-12", "health": "excellent",
            "assignedTo": "Rajesh Kumar"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_seed_animal() {
        let animal = simba();
        assert_eq!(animal.number.as_deref(), Some("001"));
        assert_eq!(animal.health, HealthStatus::Excellent);
        assert!(animal.is_assigned_to("Rajesh Kumar"));
    }

    #[test]
    fn test_numeric_number_field() {
        let animal: Animal = serde_json::from_value(serde_json::json!({
            "id": "A009", "number": 9, "name": "Kiki", "species": "Parrot"
        }))
        .unwrap();
        assert_eq!(animal.number.as_deref(), Some("9"));
        assert_eq!(animal.health, HealthStatus::Good);
    }

    #[test]
    fn test_unknown_health_rejected() {
        let result: Result<Animal, _> = serde_json::from_value(serde_json::json!({
            "id": "A001", "name": "Simba", "species": "Lion", "health": "sleepy"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_health_ordering() {
        assert!(HealthStatus::Poor < HealthStatus::Fair);
        assert!(HealthStatus::Good < HealthStatus::Excellent);
        assert!(HealthStatus::Fair.needs_attention());
        assert!(!HealthStatus::Good.needs_attention());
    }

    #[test]
    fn test_search() {
        let animal = simba();
        assert!(animal.matches_search("LION"));
        assert!(animal.matches_search("sim"));
        assert!(animal.matches_search("a00"));
        assert!(animal.matches_search(""));
        assert!(!animal.matches_search("tiger"));
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = AnimalDraft {
            name: "Kiki".into(),
            species: "Parrot".into(),
            age: "2 years".into(),
            enclosure: "E-1".into(),
            assigned_to: String::new(),
            ..Default::default()
        };
        assert_eq!(draft.validate().unwrap_err().field, "assignedTo");
        draft.assigned_to = "Sunita Devi".into();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = AnimalPatch {
            health: Some(HealthStatus::Good),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), serde_json::json!({"health": "good"}));
    }
}
