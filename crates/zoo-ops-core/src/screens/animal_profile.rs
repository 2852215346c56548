//! Animal profile: the selected animal and its log history.

use std::sync::Arc;

use async_trait::async_trait;

use super::ScreenController;
use crate::models::{Animal, Collection, Observation};
use crate::store::Stores;
use crate::views::observations_for_animal;

pub struct AnimalProfile {
    stores: Arc<Stores>,
    animal: Animal,
}

#[async_trait]
impl ScreenController for AnimalProfile {
    const SOURCES: &'static [Collection] = &[Collection::Observations];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl AnimalProfile {
    pub fn new(stores: Arc<Stores>, animal: Animal) -> Self {
        Self { stores, animal }
    }

    pub fn animal(&self) -> &Animal {
        &self.animal
    }

    /// Logs for this animal, newest first.
    pub fn logs(&self) -> Vec<Observation> {
        let observations = self.stores.observations.items();
        observations_for_animal(&observations, &self.animal.id)
            .into_iter()
            .cloned()
            .collect()
    }
}
