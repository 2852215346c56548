//! Shared entity stores.
//!
//! One [`EntityStore`] per entity type holds the client's copy of that
//! collection. Screens read from and mutate through the stores, so an edit
//! made on one screen is visible on every other screen without refetching.

mod entity;
mod registry;

pub use entity::*;
pub use registry::*;

use serde_json::Value;
use thiserror::Error;

use crate::api::ApiError;
use crate::models::ValidationError;

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    Payload(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Payload(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shallow merge: every key of `overlay` replaces the same key in `base`.
///
/// Non-object values leave `base` untouched.
pub fn merge_json(base: &mut Value, overlay: &Value) {
    if let (Value::Object(target), Value::Object(fields)) = (base, overlay) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_overwrites_and_keeps() {
        let mut base = json!({"id": "t1", "status": "pending", "title": "Feed"});
        merge_json(&mut base, &json!({"status": "completed", "note": null}));
        assert_eq!(base, json!({"id": "t1", "status": "completed", "title": "Feed", "note": null}));
    }

    #[test]
    fn test_merge_non_object_noop() {
        let mut base = json!({"id": "a"});
        merge_json(&mut base, &json!(["x"]));
        assert_eq!(base, json!({"id": "a"}));
    }
}
