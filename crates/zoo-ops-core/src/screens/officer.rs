//! Officer dashboard: feeding records and their cost.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ScreenController, ScreenResult, Session};
use crate::export::{feeding_cost_report, feeding_records, health_report, to_csv, ExportResult};
use crate::i18n::Message;
use crate::models::{Alert, Animal, Collection, FeedingDraft, FeedingPatch, FeedingRecord, FeedingStatus};
use crate::policy::Action;
use crate::store::Stores;

/// A feeding record joined with its animal.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedingRow {
    pub record: FeedingRecord,
    pub animal: Option<Animal>,
}

pub struct OfficerDashboard {
    stores: Arc<Stores>,
    session: Session,
    pub draft: FeedingDraft,
}

#[async_trait]
impl ScreenController for OfficerDashboard {
    const SOURCES: &'static [Collection] = &[Collection::Animals, Collection::Alerts, Collection::FeedingRecords];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl OfficerDashboard {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            draft: FeedingDraft::default(),
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.stores.feeding.items().iter().map(|r| r.cost).sum()
    }

    pub fn rows(&self) -> Vec<FeedingRow> {
        let animals = self.stores.animals.items();
        self.stores
            .feeding
            .items()
            .into_iter()
            .map(|record| FeedingRow {
                animal: animals.iter().find(|a| a.id == record.animal_id).cloned(),
                record,
            })
            .collect()
    }

    pub fn pending(&self) -> Vec<FeedingRecord> {
        self.stores
            .feeding
            .items()
            .into_iter()
            .filter(|r| r.status == FeedingStatus::Pending)
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

    /// Set the draft cost from form text; must be a number.
    pub fn set_cost(&mut self, text: &str) -> ScreenResult<()> {
        let cost = text
            .trim()
            .trim_start_matches('₹')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| {
                self.session
                    .invalid(Message::FillRequiredFields)
                    .with_detail(format!("cost is not a number: {}", text))
            })?;
        self.draft.cost = cost;
        Ok(())
    }

    pub async fn add_feeding(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::ManageFeeding)?;
        let mut draft = self.draft.clone();
        draft.recorded_by = Some(self.session.user.name.clone());
        self.stores
            .feeding
            .create(&draft)
            .await
            .map_err(|e| self.session.failed(&e))?;
        self.draft = FeedingDraft::default();
        Ok(Message::FeedingAdded)
    }

    pub async fn mark_fed(&self, id: &str) -> ScreenResult<Message> {
        self.session.require(Action::ManageFeeding)?;
        let patch = FeedingPatch {
            status: Some(FeedingStatus::Completed),
        };
        self.stores
            .feeding
            .update(id, &patch)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemSaved)
    }

    pub fn export_csv(&self) -> ExportResult<String> {
        to_csv(&feeding_records(&self.stores.feeding.items(), &self.stores.animals.items()))
    }

    pub fn feeding_report(&self) -> String {
        feeding_cost_report(&self.stores.feeding.items(), &self.stores.animals.items())
    }

    pub fn health_report(&self) -> String {
        health_report(&self.stores.animals.items())
    }
}
