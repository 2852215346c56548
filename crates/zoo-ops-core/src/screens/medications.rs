//! Medication tracking.
//!
//! Prescriptions, dose logs and status changes go to the API. Treatment
//! outcomes are kept in the local [`PreferenceStore`] only.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{ErrorKind, ScreenController, ScreenError, ScreenResult, Session};
use crate::export::{medication_records, medication_report, to_csv, ExportResult};
use crate::i18n::Message;
use crate::models::{
    AdministrationEntry, AnimalPatch, Collection, HealthStatus, Medication, MedicationDraft, MedicationPatch,
    MedicationStatus, TreatmentOutcome, TreatmentRecord,
};
use crate::policy::Action;
use crate::prefs::{PreferenceStore, PrefsError, TREATMENT_RECORDS_KEY};
use crate::store::Stores;

pub struct MedicationScreen {
    stores: Arc<Stores>,
    session: Session,
    pub draft: MedicationDraft,
}

#[async_trait]
impl ScreenController for MedicationScreen {
    const SOURCES: &'static [Collection] = &[Collection::Medications, Collection::Animals];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl MedicationScreen {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            draft: MedicationDraft::default(),
        }
    }

    pub fn active(&self) -> Vec<Medication> {
        self.stores
            .medications
            .items()
            .into_iter()
            .filter(|m| m.status == MedicationStatus::Active)
            .collect()
    }

    /// Completed and discontinued courses.
    pub fn finished(&self) -> Vec<Medication> {
        self.stores
            .medications
            .items()
            .into_iter()
            .filter(|m| m.status.is_finished())
            .collect()
    }

    fn medication(&self, id: &str) -> ScreenResult<Medication> {
        self.stores.medications.get(id).ok_or_else(|| {
            ScreenError::new(ErrorKind::Action, Message::ProcessingError, self.session.language)
                .with_detail(format!("medications/{} not found", id))
        })
    }

    fn prefs_failed(&self, err: PrefsError) -> ScreenError {
        ScreenError::new(ErrorKind::Action, Message::ProcessingError, self.session.language)
            .with_detail(err.to_string())
    }

    /// Prescribe from the form, then mark the animal as in good health.
    pub async fn prescribe(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::PrescribeMedication)?;
        let animal = self.stores.animals.get(&self.draft.animal_id);
        let draft = MedicationDraft {
            animal_name: animal.as_ref().map(|a| a.name.clone()),
            prescribed_by: Some(self.session.user.name.clone()),
            status: MedicationStatus::Active,
            administration_log: Vec::new(),
            ..self.draft.clone()
        };
        let medication = self
            .stores
            .medications
            .create(&draft)
            .await
            .map_err(|e| self.session.failed(&e))?;
        info!("[Meds] {} prescribed for {}", medication.medication_name, medication.animal_id);

        if animal.is_some() {
            let patch = AnimalPatch {
                health: Some(HealthStatus::Good),
                ..Default::default()
            };
            // The prescription is already saved; a failed health update is only logged.
            if let Err(e) = self.stores.animals.update(&medication.animal_id, &patch).await {
                warn!("[Meds] health update for {} failed: {}", medication.animal_id, e);
            }
        }
        self.draft = MedicationDraft::default();
        Ok(Message::MedicationAdded)
    }

    /// Append a dose to the administration log.
    pub async fn log_administration(&self, id: &str, notes: &str) -> ScreenResult<Message> {
        self.session.require(Action::LogAdministration)?;
        let medication = self.medication(id)?;
        let mut log = medication.administration_log;
        log.push(AdministrationEntry::new(&self.session.user.name, notes));
        let patch = MedicationPatch {
            administration_log: Some(log),
            ..Default::default()
        };
        self.stores
            .medications
            .update(id, &patch)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::DoseLogged)
    }

    pub async fn change_status(&self, id: &str, status: MedicationStatus) -> ScreenResult<Message> {
        self.session.require(Action::ChangeMedicationStatus)?;
        let patch = MedicationPatch {
            status: Some(status),
            ..Default::default()
        };
        self.stores
            .medications
            .update(id, &patch)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemSaved)
    }

    pub async fn delete(&self, id: &str) -> ScreenResult<Message> {
        self.session.require(Action::DeleteMedication)?;
        self.stores
            .medications
            .remove(id)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemDeleted)
    }

    pub fn outcomes(&self, prefs: &PreferenceStore) -> ScreenResult<Vec<TreatmentRecord>> {
        prefs
            .get_or_default(TREATMENT_RECORDS_KEY)
            .map_err(|e| self.prefs_failed(e))
    }

    /// Record how a course ended. Stored on this device only.
    pub fn record_outcome(
        &self,
        prefs: &PreferenceStore,
        id: &str,
        outcome: TreatmentOutcome,
        notes: &str,
    ) -> ScreenResult<Message> {
        self.session.require(Action::RecordTreatmentOutcome)?;
        let medication = self.medication(id)?;
        let mut records = self.outcomes(prefs)?;
        records.push(TreatmentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            animal_id: medication.animal_id,
            treatment_name: medication.medication_name,
            start_date: medication.start_date,
            end_date: medication.end_date,
            outcome,
            notes: notes.trim().to_string(),
            prescribed_by: medication.prescribed_by.unwrap_or_default(),
        });
        prefs
            .set(TREATMENT_RECORDS_KEY, &records)
            .map_err(|e| self.prefs_failed(e))?;
        Ok(Message::ItemSaved)
    }

    pub fn export_csv(&self) -> ExportResult<String> {
        to_csv(&medication_records(&self.stores.medications.items()))
    }

    pub fn report(&self, prefs: &PreferenceStore) -> ScreenResult<String> {
        let outcomes = self.outcomes(prefs)?;
        Ok(medication_report(
            &self.stores.medications.items(),
            &self.stores.animals.items(),
            &outcomes,
        ))
    }
}
