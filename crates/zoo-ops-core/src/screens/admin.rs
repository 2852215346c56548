//! Admin dashboard and user management.

use std::sync::Arc;

use async_trait::async_trait;

use super::{zookeeper::dismiss_alert, ScreenController, ScreenResult, Session};
use crate::i18n::Message;
use crate::models::{Alert, Animal, AnimalDraft, Collection, User, UserDraft, UserRole, DEFAULT_ANIMAL_IMAGE};
use crate::policy::Action;
use crate::store::Stores;
use crate::views::users_by_role;

/// Headline counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminStats {
    pub animals: usize,
    pub users: usize,
    pub active_alerts: usize,
}

pub struct AdminDashboard {
    stores: Arc<Stores>,
    session: Session,
    pub animal_draft: AnimalDraft,
    pub user_draft: UserDraft,
}

#[async_trait]
impl ScreenController for AdminDashboard {
    const SOURCES: &'static [Collection] = &[Collection::Animals, Collection::Users, Collection::Alerts];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl AdminDashboard {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            animal_draft: AnimalDraft::default(),
            user_draft: UserDraft::default(),
        }
    }

    pub fn stats(&self) -> AdminStats {
        AdminStats {
            animals: self.stores.animals.len(),
            users: self.stores.users.len(),
            active_alerts: self
                .stores
                .alerts
                .items()
                .iter()
                .filter(|a| a.is_active())
                .count(),
        }
    }

    pub fn animals(&self) -> Vec<Animal> {
        self.stores.animals.items()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.stores.alerts.items()
    }

    /// Users grouped by role, in role order; empty groups are kept.
    pub fn users_by_role(&self) -> Vec<(UserRole, Vec<User>)> {
        let users = self.stores.users.items();
        UserRole::ALL
            .iter()
            .map(|role| (*role, users_by_role(&users, *role).into_iter().cloned().collect()))
            .collect()
    }

    /// Keepers an animal can be assigned to.
    pub fn keepers(&self) -> Vec<User> {
        let users = self.stores.users.items();
        users_by_role(&users, UserRole::Zookeeper)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn create_animal(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::CreateAnimal)?;
        let mut draft = self.animal_draft.clone();
        if draft.image.is_none() {
            draft.image = Some(DEFAULT_ANIMAL_IMAGE.to_string());
        }
        self.stores
            .animals
            .create(&draft)
            .await
            .map_err(|e| self.session.failed(&e))?;
        self.animal_draft = AnimalDraft::default();
        Ok(Message::AnimalCreated)
    }

    pub async fn create_user(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::ManageUsers)?;
        self.stores
            .users
            .create(&self.user_draft)
            .await
            .map_err(|e| self.session.failed(&e))?;
        self.user_draft = UserDraft::default();
        Ok(Message::UserCreated)
    }

    pub async fn delete_user(&self, id: &str) -> ScreenResult<Message> {
        self.session.require(Action::ManageUsers)?;
        self.stores
            .users
            .remove(id)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemDeleted)
    }

    pub async fn dismiss_alert(&self, id: &str) -> ScreenResult<Message> {
        dismiss_alert(&self.stores, &self.session, id).await
    }
}
