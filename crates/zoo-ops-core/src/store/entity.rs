//! Single-collection store.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{merge_json, StoreError, StoreResult};
use crate::api::ZooApi;
use crate::models::{Resource, Validate};

const EVENT_CAPACITY: usize = 64;

/// Fetch lifecycle of a store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last load failed; items still hold the previous data
    Failed(String),
    /// Marked for refetch
    Stale,
}

/// Change notification published by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { count: usize },
    LoadFailed { message: String },
    Created { id: String },
    Updated { id: String },
    Removed { id: String },
    Invalidated,
}

struct StoreState<T> {
    items: Vec<T>,
    load_state: LoadState,
    version: u64,
}

/// Client-side copy of one API collection.
pub struct EntityStore<T: Resource> {
    api: Arc<dyn ZooApi>,
    state: RwLock<StoreState<T>>,
    events: broadcast::Sender<StoreEvent>,
}

impl<T: Resource> EntityStore<T> {
    pub fn new(api: Arc<dyn ZooApi>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            state: RwLock::new(StoreState {
                items: Vec::new(),
                load_state: LoadState::Idle,
                version: 0,
            }),
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState<T>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<T>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, event: StoreEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn commit(&self, state: &mut StoreState<T>, event: StoreEvent) {
        state.version += 1;
        self.publish(event);
    }

    /// Receive change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<T> {
        self.read().items.clone()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.read().items.iter().find(|i| i.id() == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().items.iter().any(|i| i.id() == id)
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.read().load_state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().load_state == LoadState::Loading
    }

    /// Message of the last failed load, if the store is in the failed state.
    pub fn last_error(&self) -> Option<String> {
        match &self.read().load_state {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Bumped on every successful change.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    /// Fetch the collection, replacing local items on success.
    ///
    /// On failure the previous items are kept and the store enters
    /// [`LoadState::Failed`].
    pub async fn load(&self) -> StoreResult<()> {
        self.write().load_state = LoadState::Loading;
        debug!("[Store] loading {}", T::COLLECTION);

        let result = match self.api.list(T::COLLECTION).await {
            Ok(docs) => docs
                .into_iter()
                .map(serde_json::from_value::<T>)
                .collect::<Result<Vec<T>, _>>()
                .map_err(StoreError::from),
            Err(e) => Err(StoreError::from(e)),
        };

        let mut state = self.write();
        match result {
            Ok(items) => {
                let count = items.len();
                state.items = items;
                state.load_state = LoadState::Ready;
                self.commit(&mut state, StoreEvent::Loaded { count });
                Ok(())
            }
            Err(e) => {
                warn!("[Store] load of {} failed: {}", T::COLLECTION, e);
                let message = e.to_string();
                state.load_state = LoadState::Failed(message.clone());
                self.publish(StoreEvent::LoadFailed { message });
                Err(e)
            }
        }
    }

    /// Load unless the store already holds fresh data.
    pub async fn ensure_loaded(&self) -> StoreResult<()> {
        if self.load_state() == LoadState::Ready {
            return Ok(());
        }
        self.load().await
    }

    /// Validate, create on the server, and prepend the result.
    ///
    /// The draft is merged with the server's answer so endpoints that reply
    /// with only an id still yield a complete entity.
    pub async fn create<D>(&self, draft: &D) -> StoreResult<T>
    where
        D: Validate + Serialize + Sync,
    {
        draft.validate()?;
        let mut body = serde_json::to_value(draft)?;
        let response = self.api.create(T::COLLECTION, body.clone()).await?;
        merge_json(&mut body, &response);
        let created: T = serde_json::from_value(body)?;

        let mut state = self.write();
        state.items.insert(0, created.clone());
        self.commit(
            &mut state,
            StoreEvent::Created {
                id: created.id().to_string(),
            },
        );
        debug!("[Store] created {}/{}", T::COLLECTION, created.id());
        Ok(created)
    }

    /// Send a partial patch and merge it locally once the server accepts it.
    ///
    /// Unknown ids fail with [`StoreError::NotFound`] without a request.
    pub async fn update<P>(&self, id: &str, patch: &P) -> StoreResult<T>
    where
        P: Serialize + Sync,
    {
        if !self.contains(id) {
            return Err(StoreError::NotFound(format!("{}/{}", T::COLLECTION, id)));
        }
        let patch = serde_json::to_value(patch)?;
        self.api.update(T::COLLECTION, id, patch.clone()).await?;

        let mut state = self.write();
        let position = state
            .items
            .iter()
            .position(|i| i.id() == id)
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", T::COLLECTION, id)))?;
        let mut merged: Value = serde_json::to_value(&state.items[position])?;
        merge_json(&mut merged, &patch);
        let updated: T = serde_json::from_value(merged)?;
        state.items[position] = updated.clone();
        self.commit(&mut state, StoreEvent::Updated { id: id.to_string() });
        Ok(updated)
    }

    /// Delete on the server, then drop the item locally.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        self.api.delete(T::COLLECTION, id).await?;

        let mut state = self.write();
        state.items.retain(|i| i.id() != id);
        self.commit(&mut state, StoreEvent::Removed { id: id.to_string() });
        Ok(())
    }

    /// Mark the data stale so the next [`ensure_loaded`](Self::ensure_loaded) refetches.
    pub fn invalidate(&self) {
        self.write().load_state = LoadState::Stale;
        self.publish(StoreEvent::Invalidated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiCall, InMemoryZooApi};
    use crate::models::{Alert, AlertDraft, Collection, InventoryItem, Task, TaskPatch, TaskStatus};
    use serde_json::json;

    fn seeded() -> (Arc<InMemoryZooApi>, Arc<dyn ZooApi>) {
        let api = Arc::new(InMemoryZooApi::seeded());
        let dyn_api: Arc<dyn ZooApi> = api.clone();
        (api, dyn_api)
    }

    #[tokio::test]
    async fn test_load_sets_ready() {
        let (_, api) = seeded();
        let store: EntityStore<InventoryItem> = EntityStore::new(api);
        assert_eq!(store.load_state(), LoadState::Idle);
        store.load().await.unwrap();
        assert_eq!(store.load_state(), LoadState::Ready);
        assert!(!store.is_loading());
        assert_eq!(store.len(), 4);
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_items() {
        let (mem, api) = seeded();
        let store: EntityStore<InventoryItem> = EntityStore::new(api);
        store.load().await.unwrap();

        mem.fail_collection(Collection::Inventory, true);
        let mut events = store.subscribe();
        assert!(store.load().await.is_err());
        assert_eq!(store.len(), 4);
        assert!(!store.is_loading());
        assert!(store.last_error().is_some());
        assert!(matches!(events.try_recv(), Ok(StoreEvent::LoadFailed { .. })));
    }

    #[tokio::test]
    async fn test_invalid_payload_fails_load() {
        let mem = Arc::new(InMemoryZooApi::new());
        mem.insert(Collection::Tasks, json!({"id": "t1", "title": "x", "assignedTo": "y", "status": "snoozed"}));
        let store: EntityStore<Task> = EntityStore::new(mem.clone());
        let result = store.load().await;
        assert!(matches!(result, Err(StoreError::Payload(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_merges_id_only_response() {
        let (_, api) = seeded();
        let store: EntityStore<Alert> = EntityStore::new(api);
        store.load().await.unwrap();
        let alert = store
            .create(&AlertDraft {
                kind: "sos".into(),
                message: "Tiger escaped the night house".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(alert.message, "Tiger escaped the night house");
        assert!(!alert.id.is_empty());
        assert_eq!(store.items()[0].id, alert.id);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_create_validation_skips_network() {
        let (mem, api) = seeded();
        let store: EntityStore<Alert> = EntityStore::new(api);
        let result = store.create(&AlertDraft::default()).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(mem.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_skips_network() {
        let (mem, api) = seeded();
        let store: EntityStore<Task> = EntityStore::new(api);
        store.load().await.unwrap();
        mem.clear_calls();
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let result = store.update("missing", &patch).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(mem.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_failure_leaves_item() {
        let (mem, api) = seeded();
        let store: EntityStore<Task> = EntityStore::new(api);
        store.load().await.unwrap();
        mem.fail_collection(Collection::Tasks, true);
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(store.update("task-1", &patch).await.is_err());
        assert_eq!(store.get("task-1").unwrap().status, TaskStatus::Pending);
        assert_eq!(
            mem.calls().last(),
            Some(&ApiCall::Update(Collection::Tasks, "task-1".into()))
        );
    }

    #[tokio::test]
    async fn test_invalidate_then_ensure_loaded_refetches() {
        let (mem, api) = seeded();
        let store: EntityStore<Task> = EntityStore::new(api);
        store.ensure_loaded().await.unwrap();
        store.ensure_loaded().await.unwrap();
        assert_eq!(mem.calls().len(), 1);
        store.invalidate();
        assert_eq!(store.load_state(), LoadState::Stale);
        store.ensure_loaded().await.unwrap();
        assert_eq!(mem.calls().len(), 2);
    }
}
