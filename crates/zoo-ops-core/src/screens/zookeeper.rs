//! Zookeeper dashboard.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ScreenController, ScreenResult, Session, SosDialog};
use crate::i18n::Message;
use crate::models::{Alert, Animal, Collection};
use crate::policy::Action;
use crate::store::Stores;
use crate::views::{search_animals, visible_animals};

pub struct ZookeeperDashboard {
    stores: Arc<Stores>,
    session: Session,
    /// Free-text animal search
    pub search: String,
}

#[async_trait]
impl ScreenController for ZookeeperDashboard {
    const SOURCES: &'static [Collection] = &[Collection::Animals, Collection::Alerts];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl ZookeeperDashboard {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            search: String::new(),
        }
    }

    /// Animals assigned to the keeper, filtered by the search box.
    pub fn animals(&self) -> Vec<Animal> {
        let all = self.stores.animals.items();
        let visible = visible_animals(&all, &self.session.user);
        search_animals(&visible, &self.search).into_iter().cloned().collect()
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

    pub fn sos_dialog(&self) -> SosDialog {
        SosDialog::new(self.stores.clone(), self.session.clone())
    }
}

/// Dismissing deletes the alert for everyone.
pub(crate) async fn dismiss_alert(stores: &Stores, session: &Session, id: &str) -> ScreenResult<Message> {
    session.require(Action::DismissAlert)?;
    stores
        .alerts
        .remove(id)
        .await
        .map_err(|e| session.failed(&e))?;
    Ok(Message::AlertDismissed)
}
