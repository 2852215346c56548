//! Veterinarian dashboard.

use std::sync::Arc;

use async_trait::async_trait;

use super::{zookeeper::dismiss_alert, ScreenController, ScreenResult, Session};
use crate::i18n::Message;
use crate::models::{Alert, Animal, Collection, Observation};
use crate::store::Stores;
use crate::views::health_reports;

const RECENT_LOG_COUNT: usize = 3;

/// How a recent log is badged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Has a photo or video
    Media,
    /// Submitted in fair or poor health
    Health,
    Checkup,
}

impl LogKind {
    pub fn of(observation: &Observation) -> Self {
        if observation.has_media() {
            LogKind::Media
        } else if observation
            .health_status
            .map_or(false, |h| h.needs_attention())
        {
            LogKind::Health
        } else {
            LogKind::Checkup
        }
    }
}

/// A recent observation joined with its animal.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentLog {
    pub animal: Animal,
    pub created_at: Option<String>,
    pub note: String,
    pub kind: LogKind,
}

pub struct VetDashboard {
    stores: Arc<Stores>,
    session: Session,
}

#[async_trait]
impl ScreenController for VetDashboard {
    const SOURCES: &'static [Collection] = &[Collection::Animals, Collection::Alerts, Collection::Observations];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl VetDashboard {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self { stores, session }
    }

    /// Animals in fair or poor health, worst first.
    pub fn health_reports(&self) -> Vec<Animal> {
        let animals = self.stores.animals.items();
        health_reports(&animals).into_iter().cloned().collect()
    }

    /// The newest logs, skipping any whose animal is unknown.
    pub fn recent_logs(&self) -> Vec<RecentLog> {
        let animals = self.stores.animals.items();
        self.stores
            .observations
            .items()
            .iter()
            .take(RECENT_LOG_COUNT)
            .filter_map(|log| {
                let animal = animals.iter().find(|a| a.id == log.animal_id)?;
                Some(RecentLog {
                    animal: animal.clone(),
                    created_at: log.created_at.clone(),
                    note: log.note(),
                    kind: LogKind::of(log),
                })
            })
            .collect()
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        self.stores
            .alerts
            .items()
            .into_iter()
            .filter(Alert::is_active)
            .collect()
    }

    pub async fn dismiss_alert(&self, id: &str) -> ScreenResult<Message> {
        dismiss_alert(&self.stores, &self.session, id).await
    }
}
