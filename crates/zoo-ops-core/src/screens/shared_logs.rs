//! Logs other staff shared with the current user.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ScreenController, Session};
use crate::models::{Animal, Collection, Observation};
use crate::store::Stores;
use crate::views::shared_with;

/// A shared observation and the animal it is about, when known.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedLog {
    pub observation: Observation,
    pub animal: Option<Animal>,
}

pub struct SharedLogsScreen {
    stores: Arc<Stores>,
    session: Session,
}

#[async_trait]
impl ScreenController for SharedLogsScreen {
    const SOURCES: &'static [Collection] = &[Collection::Observations, Collection::Animals];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl SharedLogsScreen {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self { stores, session }
    }

    pub fn logs(&self) -> Vec<SharedLog> {
        let observations = self.stores.observations.items();
        let animals = self.stores.animals.items();
        shared_with(&observations, &self.session.user.id)
            .into_iter()
            .map(|obs| SharedLog {
                animal: animals.iter().find(|a| a.id == obs.animal_id).cloned(),
                observation: obs.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::screens::testing;

    #[tokio::test]
    async fn test_only_logs_shared_with_user() {
        let (_, stores) = testing::seeded();
        let vet = SharedLogsScreen::new(stores.clone(), testing::session(UserRole::Vet));
        vet.load().await;
        let logs = vet.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].observation.id, "obs-1");
        assert_eq!(logs[0].animal.as_ref().map(|a| a.name.as_str()), Some("Simba"));

        let officer = SharedLogsScreen::new(stores, testing::session(UserRole::Officer));
        assert!(officer.logs().is_empty());
    }
}
