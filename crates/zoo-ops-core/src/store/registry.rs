//! The set of stores shared by every screen.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};

use super::{EntityStore, LoadState, StoreResult};
use crate::api::ZooApi;
use crate::models::{
    Alert, Animal, Collection, FeedingRecord, InventoryItem, Medication, Observation, Task, User,
};

/// One store per collection over a single API handle.
pub struct Stores {
    api: Arc<dyn ZooApi>,
    pub animals: EntityStore<Animal>,
    pub users: EntityStore<User>,
    pub alerts: EntityStore<Alert>,
    pub observations: EntityStore<Observation>,
    pub medications: EntityStore<Medication>,
    pub inventory: EntityStore<InventoryItem>,
    pub tasks: EntityStore<Task>,
    pub feeding: EntityStore<FeedingRecord>,
}

impl Stores {
    pub fn new(api: Arc<dyn ZooApi>) -> Arc<Self> {
        Arc::new(Self {
            animals: EntityStore::new(api.clone()),
            users: EntityStore::new(api.clone()),
            alerts: EntityStore::new(api.clone()),
            observations: EntityStore::new(api.clone()),
            medications: EntityStore::new(api.clone()),
            inventory: EntityStore::new(api.clone()),
            tasks: EntityStore::new(api.clone()),
            feeding: EntityStore::new(api.clone()),
            api,
        })
    }

    pub fn api(&self) -> &Arc<dyn ZooApi> {
        &self.api
    }

    /// Load one collection into its store.
    pub async fn load(&self, collection: Collection) -> StoreResult<()> {
        match collection {
            Collection::Animals => self.animals.load().await,
            Collection::Users => self.users.load().await,
            Collection::Alerts => self.alerts.load().await,
            Collection::Observations => self.observations.load().await,
            Collection::Medications => self.medications.load().await,
            Collection::Inventory => self.inventory.load().await,
            Collection::Tasks => self.tasks.load().await,
            Collection::FeedingRecords => self.feeding.load().await,
        }
    }

    /// Load several collections concurrently, reporting each outcome.
    pub async fn load_many(&self, collections: &[Collection]) -> Vec<(Collection, StoreResult<()>)> {
        let futures: Vec<BoxFuture<'_, (Collection, StoreResult<()>)>> = collections
            .iter()
            .map(|&c| async move { (c, self.load(c).await) }.boxed())
            .collect();
        join_all(futures).await
    }

    pub fn load_state(&self, collection: Collection) -> LoadState {
        match collection {
            Collection::Animals => self.animals.load_state(),
            Collection::Users => self.users.load_state(),
            Collection::Alerts => self.alerts.load_state(),
            Collection::Observations => self.observations.load_state(),
            Collection::Medications => self.medications.load_state(),
            Collection::Inventory => self.inventory.load_state(),
            Collection::Tasks => self.tasks.load_state(),
            Collection::FeedingRecords => self.feeding.load_state(),
        }
    }

    /// Mark a collection stale.
    pub fn invalidate(&self, collection: Collection) {
        match collection {
            Collection::Animals => self.animals.invalidate(),
            Collection::Users => self.users.invalidate(),
            Collection::Alerts => self.alerts.invalidate(),
            Collection::Observations => self.observations.invalidate(),
            Collection::Medications => self.medications.invalidate(),
            Collection::Inventory => self.inventory.invalidate(),
            Collection::Tasks => self.tasks.invalidate(),
            Collection::FeedingRecords => self.feeding.invalidate(),
        }
    }

    pub fn invalidate_all(&self) {
        for collection in Collection::ALL {
            self.invalidate(collection);
        }
    }
}
