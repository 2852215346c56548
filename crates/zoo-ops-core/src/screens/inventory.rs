//! Inventory management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::{ErrorKind, ScreenController, ScreenError, ScreenResult, Session};
use crate::export::{inventory_records, inventory_report, to_csv, ExportResult};
use crate::i18n::Message;
use crate::models::{Collection, InventoryDraft, InventoryItem, InventoryPatch, Validate};
use crate::policy::Action;
use crate::store::{StoreError, Stores};
use crate::views::{filter_inventory, inventory_total_value, low_stock, InventoryTab};

/// Item counts shown on the tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabBadges {
    pub all: usize,
    pub food: usize,
    pub medicine: usize,
    pub low: usize,
}

pub struct InventoryScreen {
    stores: Arc<Stores>,
    session: Session,
    pub tab: InventoryTab,
    pub search: String,
    pub draft: InventoryDraft,
    /// Id of the item being edited; `None` when the form adds a new item
    editing: Option<String>,
}

#[async_trait]
impl ScreenController for InventoryScreen {
    const SOURCES: &'static [Collection] = &[Collection::Inventory];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl InventoryScreen {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            tab: InventoryTab::All,
            search: String::new(),
            draft: InventoryDraft::default(),
            editing: None,
        }
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        let all = self.stores.inventory.items();
        filter_inventory(&all, self.tab, &self.search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn low_stock(&self) -> Vec<InventoryItem> {
        let all = self.stores.inventory.items();
        low_stock(&all).into_iter().cloned().collect()
    }

    /// Badge counts ignore the search box.
    pub fn badges(&self) -> TabBadges {
        let all = self.stores.inventory.items();
        let count = |tab| filter_inventory(&all, tab, "").len();
        TabBadges {
            all: count(InventoryTab::All),
            food: count(InventoryTab::Food),
            medicine: count(InventoryTab::Medicine),
            low: count(InventoryTab::Low),
        }
    }

    pub fn total_value(&self) -> f64 {
        inventory_total_value(&self.stores.inventory.items())
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Load an item into the form for editing.
    pub fn begin_edit(&mut self, id: &str) -> ScreenResult<()> {
        let item = self.stores.inventory.get(id).ok_or_else(|| {
            ScreenError::new(ErrorKind::Action, Message::ProcessingError, self.session.language)
                .with_detail(format!("inventory/{} not found", id))
        })?;
        self.draft = InventoryDraft::from_item(&item);
        self.editing = Some(item.id);
        Ok(())
    }

    pub fn reset_form(&mut self) {
        self.draft = InventoryDraft::default();
        self.editing = None;
    }

    /// Create a new item, or update the one being edited.
    pub async fn save(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::ManageInventory)?;
        match &self.editing {
            Some(id) => {
                self.draft
                    .validate()
                    .map_err(|e| self.session.failed(&StoreError::from(e)))?;
                self.stores
                    .inventory
                    .update(id, &self.draft.to_patch(None))
                    .await
                    .map_err(|e| self.session.failed(&e))?;
            }
            None => {
                self.stores
                    .inventory
                    .create(&self.draft)
                    .await
                    .map_err(|e| self.session.failed(&e))?;
            }
        }
        self.reset_form();
        Ok(Message::ItemSaved)
    }

    pub async fn delete(&self, id: &str) -> ScreenResult<Message> {
        self.session.require(Action::ManageInventory)?;
        self.stores
            .inventory
            .remove(id)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemDeleted)
    }

    /// Add `amount` to the stock and stamp the restock date.
    pub async fn restock(&self, id: &str, amount: f64) -> ScreenResult<Message> {
        self.session.require(Action::ManageInventory)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(self
                .session
                .invalid(Message::FillRequiredFields)
                .with_detail("restock amount must be positive"));
        }
        let item = self.stores.inventory.get(id).ok_or_else(|| {
            ScreenError::new(ErrorKind::Action, Message::ProcessingError, self.session.language)
                .with_detail(format!("inventory/{} not found", id))
        })?;
        let patch = InventoryPatch {
            quantity: Some(item.quantity + amount),
            last_restocked: Some(Utc::now().format("%Y-%m-%d").to_string()),
            ..Default::default()
        };
        self.stores
            .inventory
            .update(id, &patch)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemSaved)
    }

    pub fn export_csv(&self) -> ExportResult<String> {
        to_csv(&inventory_records(&self.stores.inventory.items()))
    }

    pub fn report(&self) -> String {
        inventory_report(&self.stores.inventory.items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiCall;
    use crate::models::{InventoryCategory, UserRole};
    use crate::screens::testing;

    #[tokio::test]
    async fn test_tabs_and_badges() {
        let (_, stores) = testing::seeded();
        let mut screen = InventoryScreen::new(stores, testing::session(UserRole::Officer));
        screen.load().await;
        assert_eq!(
            screen.badges(),
            TabBadges {
                all: 4,
                food: 2,
                medicine: 2,
                low: 1
            }
        );
        screen.tab = InventoryTab::Medicine;
        screen.search = "medivet".into();
        assert_eq!(screen.items().len(), 2);
        screen.tab = InventoryTab::Low;
        assert_eq!(screen.items()[0].name, "Pain Relief (Ibuprofen)");
    }

    #[tokio::test]
    async fn test_edit_uses_same_form() {
        let (api, stores) = testing::seeded();
        let mut screen = InventoryScreen::new(stores.clone(), testing::session(UserRole::Admin));
        screen.load().await;
        screen.begin_edit("inv-2").unwrap();
        assert_eq!(screen.draft.name, "Vegetables Mix");
        screen.draft.quantity = 60.0;
        screen.save().await.unwrap();

        assert!(screen.editing().is_none());
        assert!(api.calls().contains(&ApiCall::Update(Collection::Inventory, "inv-2".into())));
        let item = stores.inventory.get("inv-2").unwrap();
        assert_eq!(item.quantity, 60.0);
        assert!(item.is_low_stock());
        assert_eq!(item.last_restocked.as_deref(), Some("1 day ago"));
        let stored = api
            .documents(Collection::Inventory)
            .into_iter()
            .find(|d| d["id"] == "inv-2")
            .unwrap();
        assert_eq!(stored["lastRestocked"], "1 day ago");
    }

    #[tokio::test]
    async fn test_restock_adds_quantity() {
        let (_, stores) = testing::seeded();
        let screen = InventoryScreen::new(stores.clone(), testing::session(UserRole::Officer));
        screen.load().await;
        screen.restock("inv-4", 10.0).await.unwrap();
        let item = stores.inventory.get("inv-4").unwrap();
        assert_eq!(item.quantity, 18.0);
        assert!(!item.is_low_stock());
        assert!(screen.restock("inv-4", -1.0).await.is_err());
    }

    #[tokio::test]
    async fn test_add_then_delete() {
        let (_, stores) = testing::seeded();
        let mut screen = InventoryScreen::new(stores.clone(), testing::session(UserRole::Officer));
        screen.load().await;
        screen.draft = InventoryDraft {
            name: "Hay Bales".into(),
            category: InventoryCategory::Food,
            quantity: 5.0,
            unit: "bales".into(),
            min_threshold: 10.0,
            cost: 300.0,
            supplier: None,
            expiry_date: None,
        };
        screen.save().await.unwrap();
        let id = stores.inventory.items()[0].id.clone();
        assert_eq!(screen.badges().low, 2);
        screen.delete(&id).await.unwrap();
        assert_eq!(stores.inventory.len(), 4);
    }

    #[tokio::test]
    async fn test_vet_cannot_manage_inventory() {
        let (_, stores) = testing::seeded();
        let screen = InventoryScreen::new(stores, testing::session(UserRole::Vet));
        assert!(screen.delete("inv-1").await.is_err());
    }
}
