//! Screen controllers.
//!
//! A controller binds a screen to the shared [`Stores`]: it loads the
//! collections the screen reads, derives its views on demand, and routes
//! every mutation through the stores. Actions return the [`Message`] to show
//! on success or a [`ScreenError`] describing what to show instead.

mod admin;
mod animal_profile;
mod daily_log;
mod inventory;
mod medications;
mod officer;
mod shared_logs;
mod sos;
mod tasks;
mod vet;
mod zookeeper;

pub use admin::*;
pub use animal_profile::*;
pub use daily_log::*;
pub use inventory::*;
pub use medications::*;
pub use officer::*;
pub use shared_logs::*;
pub use sos::*;
pub use tasks::*;
pub use vet::*;
pub use zookeeper::*;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::i18n::{Language, Message};
use crate::models::{Collection, User};
use crate::policy::{Action, Policy};
use crate::store::{LoadState, StoreError, Stores};

/// The signed-in user and display language.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub language: Language,
}

impl Session {
    pub fn new(user: User, language: Language) -> Self {
        Self { user, language }
    }

    pub fn can(&self, action: Action) -> bool {
        Policy::allows(self.user.role, action)
    }

    /// Fail with a permission error unless the user may perform `action`.
    pub fn require(&self, action: Action) -> ScreenResult<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(ScreenError::new(ErrorKind::Permission, Message::PermissionDenied, self.language))
        }
    }

    pub fn invalid(&self, message: Message) -> ScreenError {
        ScreenError::new(ErrorKind::Validation, message, self.language)
    }

    pub fn failed(&self, err: &StoreError) -> ScreenError {
        ScreenError::from_store(err, self.language)
    }
}

/// User-visible error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Screen data could not be loaded
    Load,
    /// A mutation failed; nothing changed
    Action,
    /// Blocked before any request was made
    Validation,
    Permission,
}

/// Error shown by a screen, already translated.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ScreenError {
    pub kind: ErrorKind,
    pub message: String,
    /// Underlying cause, for logs
    pub detail: Option<String>,
}

impl ScreenError {
    pub fn new(kind: ErrorKind, message: Message, language: Language) -> Self {
        Self {
            kind,
            message: message.text(language).to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Collapse a store failure into a validation or generic action error.
    pub fn from_store(err: &StoreError, language: Language) -> Self {
        let kind = match err {
            StoreError::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Action,
        };
        let message = match err {
            StoreError::Validation(_) => Message::FillRequiredFields,
            _ => Message::ProcessingError,
        };
        Self::new(kind, message, language).with_detail(err.to_string())
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// Result of loading one source collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub collection: Collection,
    pub error: Option<String>,
}

impl SourceOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Overall screen state after a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenStatus {
    Ready,
    /// Some sources loaded; the listed ones did not
    Partial { failed: Vec<Collection> },
    Failed,
}

/// Per-source outcomes of a screen load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub sources: Vec<SourceOutcome>,
}

impl LoadReport {
    pub fn failed(&self) -> Vec<Collection> {
        self.sources
            .iter()
            .filter(|s| !s.is_ok())
            .map(|s| s.collection)
            .collect()
    }

    pub fn status(&self) -> ScreenStatus {
        let failed = self.failed();
        if failed.is_empty() {
            ScreenStatus::Ready
        } else if failed.len() == self.sources.len() {
            ScreenStatus::Failed
        } else {
            ScreenStatus::Partial { failed }
        }
    }

    /// Load error to display, naming the sources that failed.
    pub fn error(&self, language: Language) -> Option<ScreenError> {
        let failed = self.failed();
        if failed.is_empty() {
            return None;
        }
        let names = failed.iter().map(|c| c.path()).collect::<Vec<_>>().join(", ");
        Some(ScreenError::new(ErrorKind::Load, Message::ProcessingError, language).with_detail(names))
    }
}

/// Load `sources` concurrently and report each outcome.
pub async fn load_sources(stores: &Stores, sources: &[Collection]) -> LoadReport {
    let outcomes = stores.load_many(sources).await;
    let report = LoadReport {
        sources: outcomes
            .into_iter()
            .map(|(collection, result)| SourceOutcome {
                collection,
                error: result.err().map(|e| e.to_string()),
            })
            .collect(),
    };
    match report.status() {
        ScreenStatus::Ready => info!("[Screen] loaded {} sources", report.sources.len()),
        status => warn!("[Screen] load finished with {:?}", status),
    }
    report
}

/// Shared controller behaviour.
#[async_trait]
pub trait ScreenController: Send + Sync {
    /// Collections the screen reads.
    const SOURCES: &'static [Collection];

    fn stores(&self) -> &Stores;

    async fn load(&self) -> LoadReport {
        load_sources(self.stores(), Self::SOURCES).await
    }

    /// True while any source is being fetched.
    fn is_loading(&self) -> bool {
        Self::SOURCES
            .iter()
            .any(|c| self.stores().load_state(*c) == LoadState::Loading)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserRole, ValidationError};

    fn outcome(collection: Collection, ok: bool) -> SourceOutcome {
        SourceOutcome {
            collection,
            error: if ok { None } else { Some("boom".into()) },
        }
    }

    #[test]
    fn test_status_from_outcomes() {
        let ready = LoadReport {
            sources: vec![outcome(Collection::Animals, true)],
        };
        assert_eq!(ready.status(), ScreenStatus::Ready);
        assert!(ready.error(Language::En).is_none());

        let partial = LoadReport {
            sources: vec![outcome(Collection::Animals, true), outcome(Collection::Users, false)],
        };
        assert_eq!(
            partial.status(),
            ScreenStatus::Partial {
                failed: vec![Collection::Users]
            }
        );
        let err = partial.error(Language::En).unwrap();
        assert_eq!(err.kind, ErrorKind::Load);
        assert_eq!(err.detail.as_deref(), Some("users"));

        let failed = LoadReport {
            sources: vec![outcome(Collection::Animals, false)],
        };
        assert_eq!(failed.status(), ScreenStatus::Failed);
    }

    #[test]
    fn test_store_errors_translate() {
        let err = ScreenError::from_store(&StoreError::Validation(ValidationError { field: "name" }), Language::Hi);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, Message::FillRequiredFields.text(Language::Hi));

        let err = ScreenError::from_store(&StoreError::NotFound("tasks/x".into()), Language::En);
        assert_eq!(err.kind, ErrorKind::Action);
        assert_eq!(err.detail.as_deref(), Some("Record not found: tasks/x"));
    }

    #[test]
    fn test_session_permissions() {
        let session = testing::session(UserRole::Zookeeper);
        assert!(session.require(Action::SubmitDailyLog).is_ok());
        let err = session.require(Action::ManageUsers).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Permission);
    }
}
