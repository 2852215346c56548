//! Derived views over store snapshots.
//!
//! Every function here is pure: same inputs, same output, no I/O. Screens
//! call them on each render instead of caching filtered lists.

use chrono::{DateTime, Utc};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::{
    Animal, InventoryCategory, InventoryItem, Observation, Task, TaskStatus, User, UserRole,
};
use crate::policy::{Action, Policy};

/// Minimum similarity for a fuzzy animal match.
pub const ANIMAL_MATCH_THRESHOLD: f64 = 0.82;

// ============================================================================
// Animals
// ============================================================================

/// Animals the user is responsible for: zookeepers see their assigned
/// animals, everyone else sees all.
pub fn visible_animals<'a>(animals: &'a [Animal], user: &User) -> Vec<&'a Animal> {
    if Policy::allows(user.role, Action::ViewAllAnimals) {
        animals.iter().collect()
    } else {
        animals.iter().filter(|a| a.is_assigned_to(&user.name)).collect()
    }
}

pub fn search_animals<'a>(animals: &[&'a Animal], query: &str) -> Vec<&'a Animal> {
    animals
        .iter()
        .copied()
        .filter(|a| a.matches_search(query))
        .collect()
}

/// Animals in fair or poor health, worst first.
pub fn health_reports(animals: &[Animal]) -> Vec<&Animal> {
    let mut out: Vec<&Animal> = animals.iter().filter(|a| a.health.needs_attention()).collect();
    out.sort_by_key(|a| a.health);
    out
}

/// Find an animal by id, exact name, or closest name.
pub fn resolve_animal<'a>(animals: &'a [Animal], query: &str) -> Option<&'a Animal> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }
    if let Some(a) = animals.iter().find(|a| a.id.eq_ignore_ascii_case(q)) {
        return Some(a);
    }
    let q = q.to_lowercase();
    if let Some(a) = animals.iter().find(|a| a.name.to_lowercase() == q) {
        return Some(a);
    }

    animals
        .iter()
        .map(|a| (a, fuzzy_match(&q, &a.name.to_lowercase())))
        .filter(|(_, score)| *score >= ANIMAL_MATCH_THRESHOLD)
        .max_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(a, _)| a)
}

/// Combined similarity: Jaro-Winkler for typos, Levenshtein for overall shape.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}

pub fn animal_name<'a>(animals: &'a [Animal], id: &str) -> Option<&'a str> {
    animals.iter().find(|a| a.id == id).map(|a| a.name.as_str())
}

// ============================================================================
// Inventory
// ============================================================================

/// Inventory screen tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventoryTab {
    #[default]
    All,
    Food,
    Medicine,
    Low,
}

impl std::str::FromStr for InventoryTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(InventoryTab::All),
            "food" => Ok(InventoryTab::Food),
            "medicine" => Ok(InventoryTab::Medicine),
            "low" => Ok(InventoryTab::Low),
            other => Err(format!("unknown inventory tab: {}", other)),
        }
    }
}

pub fn filter_inventory<'a>(items: &'a [InventoryItem], tab: InventoryTab, query: &str) -> Vec<&'a InventoryItem> {
    items
        .iter()
        .filter(|i| i.matches_search(query))
        .filter(|i| match tab {
            InventoryTab::All => true,
            InventoryTab::Food => i.category == InventoryCategory::Food,
            InventoryTab::Medicine => i.category == InventoryCategory::Medicine,
            InventoryTab::Low => i.is_low_stock(),
        })
        .collect()
}

pub fn low_stock(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|i| i.is_low_stock()).collect()
}

pub fn inventory_total_value(items: &[InventoryItem]) -> f64 {
    items.iter().map(InventoryItem::total_value).sum()
}

// ============================================================================
// Tasks
// ============================================================================

/// Task screen tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskTab {
    #[default]
    All,
    Status(TaskStatus),
}

impl std::str::FromStr for TaskTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TaskTab::All);
        }
        s.parse::<TaskStatus>().map(TaskTab::Status)
    }
}

/// Tasks the user may see: admins see all, others their own.
pub fn visible_tasks<'a>(tasks: &'a [Task], user: &User) -> Vec<&'a Task> {
    if Policy::allows(user.role, Action::ViewAllTasks) {
        tasks.iter().collect()
    } else {
        tasks.iter().filter(|t| t.assigned_to == user.name).collect()
    }
}

/// Apply a tab and sort newest first.
pub fn filter_tasks<'a>(tasks: &[&'a Task], tab: TaskTab) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .copied()
        .filter(|t| match tab {
            TaskTab::All => true,
            TaskTab::Status(s) => t.status == s,
        })
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

pub fn overdue_tasks<'a>(tasks: &[&'a Task], now: DateTime<Utc>) -> Vec<&'a Task> {
    tasks.iter().copied().filter(|t| t.is_overdue(now)).collect()
}

/// Per-status counts shown as tab badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn task_counts(tasks: &[&Task]) -> TaskCounts {
    let mut counts = TaskCounts {
        total: tasks.len(),
        ..Default::default()
    };
    for t in tasks {
        match t.status {
            TaskStatus::Pending => counts.pending += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

// ============================================================================
// Users and observations
// ============================================================================

pub fn users_by_role(users: &[User], role: UserRole) -> Vec<&User> {
    users.iter().filter(|u| u.role == role).collect()
}

/// Staff who can be assigned tasks.
pub fn assignable_users(users: &[User]) -> Vec<&User> {
    users
        .iter()
        .filter(|u| matches!(u.role, UserRole::Zookeeper | UserRole::Vet))
        .collect()
}

pub fn shared_with<'a>(observations: &'a [Observation], user_id: &str) -> Vec<&'a Observation> {
    observations.iter().filter(|o| o.is_shared_with(user_id)).collect()
}

pub fn observations_for_animal<'a>(observations: &'a [Observation], animal_id: &str) -> Vec<&'a Observation> {
    observations.iter().filter(|o| o.animal_id == animal_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthStatus, TaskPriority};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn animal(id: &str, name: &str, keeper: &str, health: HealthStatus) -> Animal {
        Animal {
            id: id.into(),
            number: None,
            name: name.into(),
            species: "Lion".into(),
            age: None,
            health,
            mood: None,
            appetite: None,
            assigned_to: Some(keeper.into()),
            enclosure: None,
            image: None,
            last_checked: None,
        }
    }

    fn item(name: &str, category: InventoryCategory, quantity: f64, min: f64) -> InventoryItem {
        InventoryItem {
            id: name.to_lowercase(),
            name: name.into(),
            category,
            quantity,
            unit: "kg".into(),
            min_threshold: min,
            cost: 10.0,
            supplier: None,
            last_restocked: None,
            expiry_date: None,
        }
    }

    fn task(id: &str, assignee: &str, status: TaskStatus, created: &str) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            assigned_to: assignee.into(),
            assigned_by: None,
            animal_id: None,
            priority: TaskPriority::Medium,
            status,
            due_date: "2024-01-01".into(),
            created_at: Some(created.into()),
            comments: vec![],
            attachments: vec![],
        }
    }

    fn user(name: &str, role: UserRole) -> User {
        User {
            id: name.to_lowercase(),
            name: name.into(),
            role,
            email: None,
        }
    }

    #[test]
    fn test_zookeeper_sees_assigned_only() {
        let animals = vec![
            animal("A001", "Simba", "Rajesh Kumar", HealthStatus::Good),
            animal("A002", "Raja", "Sunita Devi", HealthStatus::Good),
        ];
        let keeper = user("Rajesh Kumar", UserRole::Zookeeper);
        let vet = user("Dr. Anjali Verma", UserRole::Vet);
        assert_eq!(visible_animals(&animals, &keeper).len(), 1);
        assert_eq!(visible_animals(&animals, &vet).len(), 2);
    }

    #[test]
    fn test_health_reports_worst_first() {
        let animals = vec![
            animal("A001", "Simba", "x", HealthStatus::Fair),
            animal("A002", "Raja", "x", HealthStatus::Excellent),
            animal("A003", "Moti", "x", HealthStatus::Poor),
        ];
        let ids: Vec<&str> = health_reports(&animals).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A003", "A001"]);
    }

    #[test]
    fn test_resolve_animal() {
        let animals = vec![
            animal("A001", "Simba", "x", HealthStatus::Good),
            animal("A003", "Moti", "x", HealthStatus::Good),
        ];
        assert_eq!(resolve_animal(&animals, "a003").unwrap().name, "Moti");
        assert_eq!(resolve_animal(&animals, "SIMBA").unwrap().id, "A001");
        assert_eq!(resolve_animal(&animals, "Simbaa").unwrap().id, "A001");
        assert!(resolve_animal(&animals, "Giraffe").is_none());
        assert!(resolve_animal(&animals, " ").is_none());
    }

    #[test]
    fn test_raw_meat_low_stock_badge() {
        let items = vec![
            item("Raw Meat", InventoryCategory::Food, 40.0, 50.0),
            item("Vegetables Mix", InventoryCategory::Food, 200.0, 75.0),
        ];
        let low = filter_inventory(&items, InventoryTab::Low, "");
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Raw Meat");
        assert_eq!(low_stock(&items).len(), 1);
    }

    #[test]
    fn test_task_scope_tab_and_order() {
        let tasks = vec![
            task("t1", "Rajesh Kumar", TaskStatus::Pending, "2024-03-01T00:00:00Z"),
            task("t2", "Sunita Devi", TaskStatus::Pending, "2024-03-02T00:00:00Z"),
            task("t3", "Rajesh Kumar", TaskStatus::Completed, "2024-03-03T00:00:00Z"),
        ];
        let keeper = user("Rajesh Kumar", UserRole::Zookeeper);
        let admin = user("Priya Sharma", UserRole::Admin);

        let mine = visible_tasks(&tasks, &keeper);
        assert_eq!(mine.len(), 2);
        let all = visible_tasks(&tasks, &admin);
        let sorted = filter_tasks(&all, TaskTab::All);
        assert_eq!(sorted[0].id, "t3");
        let pending = filter_tasks(&all, TaskTab::Status(TaskStatus::Pending));
        assert_eq!(pending.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["t2", "t1"]);

        let counts = task_counts(&all);
        assert_eq!(counts, TaskCounts { total: 3, pending: 2, in_progress: 0, completed: 1 });

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(overdue_tasks(&all, now).len(), 2);
    }

    #[test]
    fn test_assignable_users() {
        let users = vec![
            user("Priya Sharma", UserRole::Admin),
            user("Rajesh Kumar", UserRole::Zookeeper),
            user("Dr. Anjali Verma", UserRole::Vet),
            user("Vikram Singh", UserRole::Officer),
        ];
        assert_eq!(assignable_users(&users).len(), 2);
        assert_eq!(users_by_role(&users, UserRole::Officer)[0].name, "Vikram Singh");
    }

    fn arb_item() -> impl Strategy<Value = InventoryItem> {
        (
            "[a-zA-Z ]{1,12}",
            prop_oneof![Just(InventoryCategory::Food), Just(InventoryCategory::Medicine)],
            0u32..300,
            0u32..300,
        )
            .prop_map(|(name, cat, q, m)| item(&name, cat, q as f64, m as f64))
    }

    proptest! {
        #[test]
        fn prop_inventory_filter_is_subset(
            items in prop::collection::vec(arb_item(), 0..20),
            query in "[a-z]{0,3}",
        ) {
            for tab in [InventoryTab::All, InventoryTab::Food, InventoryTab::Medicine, InventoryTab::Low] {
                let filtered = filter_inventory(&items, tab, &query);
                prop_assert!(filtered.len() <= items.len());
                for i in &filtered {
                    prop_assert!(items.iter().any(|x| std::ptr::eq(x, *i)));
                    prop_assert!(i.matches_search(&query));
                    if tab == InventoryTab::Low {
                        prop_assert!(i.quantity < i.min_threshold);
                    }
                }
            }
        }

        #[test]
        fn prop_low_stock_matches_predicate(items in prop::collection::vec(arb_item(), 0..20)) {
            let low = low_stock(&items);
            let expected = items.iter().filter(|i| i.quantity < i.min_threshold).count();
            prop_assert_eq!(low.len(), expected);
        }

        #[test]
        fn prop_visible_animals_subset(
            keepers in prop::collection::vec(prop_oneof![Just("Rajesh Kumar"), Just("Sunita Devi")], 0..15),
        ) {
            let animals: Vec<Animal> = keepers
                .iter()
                .enumerate()
                .map(|(i, k)| animal(&format!("A{:03}", i), "X", k, HealthStatus::Good))
                .collect();
            let keeper = user("Rajesh Kumar", UserRole::Zookeeper);
            let visible = visible_animals(&animals, &keeper);
            prop_assert!(visible.iter().all(|a| a.is_assigned_to("Rajesh Kumar")));
            prop_assert_eq!(visible.len(), keepers.iter().filter(|k| **k == "Rajesh Kumar").count());
        }
    }
}
