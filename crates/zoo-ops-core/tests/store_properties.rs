//! Store round-trip properties and CSV escaping.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Value;
use zoo_ops_core::export::{escape_csv, to_csv, ExportRecord};
use zoo_ops_core::models::{AnimalDraft, AnimalPatch, Collection, HealthStatus};
use zoo_ops_core::{InMemoryZooApi, Stores};

fn seeded() -> (Arc<InMemoryZooApi>, Arc<Stores>) {
    let api = Arc::new(InMemoryZooApi::seeded());
    let stores = Stores::new(api.clone());
    (api, stores)
}

fn docs_except(api: &InMemoryZooApi, collection: Collection, id: &str) -> Vec<Value> {
    api.documents(collection)
        .into_iter()
        .filter(|d| d["id"] != id)
        .collect()
}

#[tokio::test]
async fn create_then_load_contains_entity_once() {
    let (_, stores) = seeded();
    stores.animals.load().await.unwrap();
    let created = stores
        .animals
        .create(&AnimalDraft {
            name: "Kiki".into(),
            species: "Parrot".into(),
            age: "2 years".into(),
            enclosure: "E-2".into(),
            assigned_to: "Sunita Devi".into(),
            health: HealthStatus::Good,
            image: None,
        })
        .await
        .unwrap();

    stores.animals.load().await.unwrap();
    let matches = stores
        .animals
        .items()
        .iter()
        .filter(|a| a.id == created.id)
        .count();
    assert_eq!(matches, 1);
    assert_eq!(stores.animals.len(), 5);
}

#[tokio::test]
async fn update_leaves_other_entities_unchanged() {
    let (api, stores) = seeded();
    stores.animals.load().await.unwrap();
    let before_remote = docs_except(&api, Collection::Animals, "A002");
    let before_local: Vec<_> = stores
        .animals
        .items()
        .into_iter()
        .filter(|a| a.id != "A002")
        .collect();

    let patch = AnimalPatch {
        health: Some(HealthStatus::Poor),
        ..Default::default()
    };
    let updated = stores.animals.update("A002", &patch).await.unwrap();
    assert_eq!(updated.health, HealthStatus::Poor);

    assert_eq!(docs_except(&api, Collection::Animals, "A002"), before_remote);
    let after_local: Vec<_> = stores
        .animals
        .items()
        .into_iter()
        .filter(|a| a.id != "A002")
        .collect();
    assert_eq!(after_local, before_local);
}

#[tokio::test]
async fn remove_drops_only_that_id() {
    let (_, stores) = seeded();
    stores.inventory.load().await.unwrap();
    let others: Vec<String> = stores
        .inventory
        .items()
        .into_iter()
        .map(|i| i.id)
        .filter(|id| id != "inv-2")
        .collect();

    stores.inventory.remove("inv-2").await.unwrap();
    assert!(!stores.inventory.contains("inv-2"));
    let remaining: Vec<String> = stores.inventory.items().into_iter().map(|i| i.id).collect();
    assert_eq!(remaining, others);

    stores.inventory.load().await.unwrap();
    assert!(!stores.inventory.contains("inv-2"));
}

#[tokio::test]
async fn failed_load_keeps_previous_items() {
    let (api, stores) = seeded();
    stores.tasks.load().await.unwrap();
    api.fail_collection(Collection::Tasks, true);
    assert!(stores.tasks.load().await.is_err());
    assert_eq!(stores.tasks.len(), 1);
    assert!(stores.tasks.last_error().is_some());
    assert!(!stores.tasks.is_loading());
}

proptest! {
    #[test]
    fn prop_escape_csv_quotes_special_fields(field in ".{0,24}") {
        let escaped = escape_csv(&field);
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
            let inner = &escaped[1..escaped.len() - 1];
            prop_assert_eq!(inner.replace("\"\"", "\""), field.clone());
            prop_assert_eq!(inner.matches('"').count(), field.matches('"').count() * 2);
        } else {
            prop_assert_eq!(escaped, field);
        }
    }

    #[test]
    fn prop_csv_row_matches_escaped_fields(a in "[a-z,\" ]{0,10}", b in "[0-9\n]{0,6}") {
        let record = ExportRecord::new().field("A", a.clone()).field("B", b.clone());
        let csv = to_csv(&[record]).unwrap();
        let expected = format!("A,B\n{},{}", escape_csv(&a), escape_csv(&b));
        prop_assert_eq!(csv, expected);
    }
}
