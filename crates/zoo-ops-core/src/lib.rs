//! Zoo Ops Core Library
//!
//! Role-based client for zoo operations: keepers log daily observations,
//! vets track treatments, officers manage feeding and stock, admins manage
//! animals and staff.
//!
//! # Architecture
//!
//! ```text
//!  Screen controllers ──► Stores (one per entity type) ──► ZooApi
//!         │                        │                     ├─ HttpZooApi (REST + multipart)
//!         │                        └─ subscribe/invalidate  └─ InMemoryZooApi (seeded)
//!         │
//!         ├─► views    (pure filters over loaded data)
//!         ├─► policy   (who may do what)
//!         ├─► export   (CSV, report text, PDF)
//!         └─► prefs    (local SQLite key-value: language, theme, notifications)
//! ```
//!
//! # Modules
//!
//! - [`api`]: REST client trait, HTTP and in-memory implementations
//! - [`models`]: Domain types (Animal, Observation, Task, ...)
//! - [`store`]: Per-entity stores with load state and change events
//! - [`screens`]: Controllers for each screen
//! - [`export`]: CSV, report text and PDF rendering
//! - [`notifications`]: Notification preferences and dispatch

pub mod api;
pub mod context;
pub mod export;
pub mod i18n;
pub mod models;
pub mod notifications;
pub mod policy;
pub mod prefs;
pub mod screens;
pub mod store;
pub mod views;

// Re-export commonly used types
pub use api::{HttpZooApi, InMemoryZooApi, ZooApi};
pub use context::{AppContext, Screen};
pub use i18n::{Language, Message};
pub use models::{Collection, User, UserRole};
pub use prefs::PreferenceStore;
pub use screens::{ScreenController, ScreenError, Session};
pub use store::Stores;
pub use zoo_ops_ai::MonitoringSummary;

use std::path::Path;

// =========================================================================
// Crate Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ZooError {
    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Store(#[from] store::StoreError),

    #[error(transparent)]
    Prefs(#[from] prefs::PrefsError),

    #[error(transparent)]
    Export(#[from] export::ExportError),

    #[error(transparent)]
    Screen(#[from] screens::ScreenError),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type ZooResult<T> = Result<T, ZooError>;

// =========================================================================
// Factory Functions
// =========================================================================

/// Open the preference store at `path`, or an in-memory one.
pub fn open_preferences(path: Option<&Path>) -> ZooResult<PreferenceStore> {
    let prefs = match path {
        Some(path) => PreferenceStore::open(path)?,
        None => PreferenceStore::open_in_memory()?,
    };
    Ok(prefs)
}

/// Find a user by name (case-insensitive) or id, loading users if needed.
pub async fn find_user(stores: &Stores, name_or_id: &str) -> ZooResult<User> {
    stores.users.ensure_loaded().await?;
    let wanted = name_or_id.trim();
    stores
        .users
        .items()
        .into_iter()
        .find(|u| u.id == wanted || u.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ZooError::NotFound(format!("user {}", wanted)))
}
