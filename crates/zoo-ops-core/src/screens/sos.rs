//! SOS dialog.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{ScreenController, ScreenResult, Session};
use crate::i18n::Message;
use crate::models::{AlertDraft, Collection};
use crate::policy::Action;
use crate::store::Stores;

pub struct SosDialog {
    stores: Arc<Stores>,
    session: Session,
    pub animal_id: String,
    pub message: String,
}

#[async_trait]
impl ScreenController for SosDialog {
    const SOURCES: &'static [Collection] = &[Collection::Animals];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl SosDialog {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            animal_id: String::new(),
            message: String::new(),
        }
    }

    /// Raise an SOS alert for the selected animal at its enclosure.
    ///
    /// The dialog is cleared only after the alert is accepted.
    pub async fn send(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::SendSos)?;
        if self.animal_id.trim().is_empty() || self.message.trim().is_empty() {
            return Err(self.session.invalid(Message::SelectAnimalAndMessage));
        }
        let animal = self
            .stores
            .animals
            .get(&self.animal_id)
            .ok_or_else(|| self.session.invalid(Message::SelectAnimalAndMessage))?;

        let draft = AlertDraft {
            kind: "sos".to_string(),
            message: self.message.trim().to_string(),
            animal_name: Some(animal.name.clone()),
            animal_id: Some(animal.id.clone()),
            location: animal.enclosure.clone(),
            created_by: Some(self.session.user.name.clone()),
        };
        let alert = self
            .stores
            .alerts
            .create(&draft)
            .await
            .map_err(|e| self.session.failed(&e))?;
        info!("[SOS] alert {} raised for {}", alert.id, animal.name);

        self.animal_id.clear();
        self.message.clear();
        Ok(Message::SosSent)
    }
}
