//! Domain models for zoo operations.

mod alert;
mod animal;
mod feeding;
mod inventory;
mod medication;
mod observation;
mod task;
mod user;
pub(crate) mod wire;

pub use alert::*;
pub use animal::*;
pub use feeding::*;
pub use inventory::*;
pub use medication::*;
pub use observation::*;
pub use task::*;
pub use user::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// REST collections exposed by the zoo API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Animals,
    Users,
    Alerts,
    Observations,
    Medications,
    Inventory,
    Tasks,
    FeedingRecords,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Animals,
        Collection::Users,
        Collection::Alerts,
        Collection::Observations,
        Collection::Medications,
        Collection::Inventory,
        Collection::Tasks,
        Collection::FeedingRecords,
    ];

    /// Path segment under the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Animals => "animals",
            Collection::Users => "users",
            Collection::Alerts => "alerts",
            Collection::Observations => "observations",
            Collection::Medications => "medications",
            Collection::Inventory => "inventory",
            Collection::Tasks => "tasks",
            Collection::FeedingRecords => "feeding_records",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// An entity owned by one API collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

/// A required form field was left blank.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required field: {field}")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Local validation run before any network call.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reject blank (empty or whitespace-only) values.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(())
    }
}

/// Like [`require`] for optional values.
pub fn require_some(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    require(field, value.unwrap_or_default())
}

/// Format a quantity without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::FeedingRecords.path(), "feeding_records");
        assert_eq!(Collection::Animals.to_string(), "animals");
        assert_eq!(Collection::ALL.len(), 8);
    }

    #[test]
    fn test_require_blank() {
        assert!(require("name", "Simba").is_ok());
        assert_eq!(require("name", "   "), Err(ValidationError { field: "name" }));
        assert!(require_some("age", None).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(150.0), "150");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
