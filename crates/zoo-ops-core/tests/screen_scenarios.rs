//! End-to-end screen scenarios against the in-memory API.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use zoo_ops_core::api::ApiCall;
use zoo_ops_core::models::{Collection, TaskStatus, User, UserRole};
use zoo_ops_core::screens::{
    AdminDashboard, DailyLogScreen, ErrorKind, InventoryScreen, ScreenController, ScreenStatus, Session, TaskScreen,
};
use zoo_ops_core::views::{InventoryTab, TaskTab};
use zoo_ops_core::{InMemoryZooApi, Language, Stores};

fn session(id: &str, name: &str, role: UserRole) -> Session {
    Session::new(
        User {
            id: id.into(),
            name: name.into(),
            role,
            email: None,
        },
        Language::En,
    )
}

fn admin() -> Session {
    session("u1", "Priya Sharma", UserRole::Admin)
}

#[tokio::test]
async fn raw_meat_below_threshold_shows_one_low_stock_badge() {
    let api = Arc::new(InMemoryZooApi::new());
    api.insert(
        Collection::Inventory,
        json!({"id": "inv-1", "name": "Raw Meat", "category": "food",
               "quantity": 40, "unit": "kg", "minThreshold": 50, "cost": 450}),
    );
    let stores = Stores::new(api);
    let mut screen = InventoryScreen::new(stores, admin());
    assert_eq!(screen.load().await.status(), ScreenStatus::Ready);

    screen.tab = InventoryTab::Low;
    let low = screen.items();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Raw Meat");
    assert_eq!(screen.badges().low, 1);
    assert_eq!(screen.low_stock().len(), 1);
}

#[tokio::test]
async fn past_due_task_is_overdue_until_completed() {
    let api = Arc::new(InMemoryZooApi::new());
    let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string();
    api.insert(
        Collection::Tasks,
        json!({"id": "task-1", "title": "Trim hooves", "assignedTo": "Rajesh Kumar",
               "priority": "medium", "status": "pending", "dueDate": yesterday}),
    );
    let stores = Stores::new(api);
    let mut screen = TaskScreen::new(stores, admin());
    screen.load().await;

    let now = Utc::now();
    assert_eq!(screen.overdue(now).len(), 1);

    screen.change_status("task-1", TaskStatus::Completed).await.unwrap();
    assert!(screen.overdue(now).is_empty());
    assert!(screen.overdue(now + Duration::days(365)).is_empty());
    screen.tab = TaskTab::Status(TaskStatus::Completed);
    assert_eq!(screen.tasks().len(), 1);
}

#[tokio::test]
async fn empty_daily_log_is_blocked_without_request() {
    let api = Arc::new(InMemoryZooApi::seeded());
    let stores = Stores::new(api.clone());
    stores.animals.load().await.unwrap();
    let animal = stores.animals.get("A001").unwrap();
    let mut screen = DailyLogScreen::new(stores, session("u2", "Rajesh Kumar", UserRole::Zookeeper), animal);
    screen.load().await;
    api.clear_calls();

    screen.form.injuries = "   ".into();
    let err = screen.submit().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn partial_load_keeps_sources_that_succeeded() {
    let api = Arc::new(InMemoryZooApi::seeded());
    api.fail_collection(Collection::Users, true);
    let stores = Stores::new(api.clone());
    let screen = AdminDashboard::new(stores, admin());

    let report = screen.load().await;
    assert_eq!(
        report.status(),
        ScreenStatus::Partial {
            failed: vec![Collection::Users]
        }
    );
    let err = report.error(Language::En).unwrap();
    assert_eq!(err.kind, ErrorKind::Load);
    assert_eq!(err.detail.as_deref(), Some("users"));

    let stats = screen.stats();
    assert_eq!(stats.animals, 4);
    assert_eq!(stats.users, 0);
    assert!(!screen.is_loading());

    // The three sources were requested together.
    let lists = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ApiCall::List(_)))
        .count();
    assert_eq!(lists, 3);
}
