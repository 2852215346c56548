//! Task board.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ErrorKind, ScreenController, ScreenError, ScreenResult, Session};
use crate::export::{task_records, task_report, to_csv, ExportResult};
use crate::i18n::Message;
use crate::models::{Collection, Task, TaskComment, TaskDraft, TaskPatch, TaskStatus, User};
use crate::policy::Action;
use crate::store::Stores;
use crate::views::{assignable_users, filter_tasks, overdue_tasks, task_counts, visible_tasks, TaskCounts, TaskTab};

pub struct TaskScreen {
    stores: Arc<Stores>,
    session: Session,
    pub tab: TaskTab,
    pub draft: TaskDraft,
}

#[async_trait]
impl ScreenController for TaskScreen {
    const SOURCES: &'static [Collection] = &[Collection::Tasks, Collection::Users, Collection::Animals];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl TaskScreen {
    pub fn new(stores: Arc<Stores>, session: Session) -> Self {
        Self {
            stores,
            session,
            tab: TaskTab::All,
            draft: TaskDraft::default(),
        }
    }

    fn visible(&self) -> Vec<Task> {
        let all = self.stores.tasks.items();
        visible_tasks(&all, &self.session.user)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Visible tasks on the current tab, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        let visible = self.visible();
        let refs: Vec<&Task> = visible.iter().collect();
        filter_tasks(&refs, self.tab).into_iter().cloned().collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let visible = self.visible();
        let refs: Vec<&Task> = visible.iter().collect();
        task_counts(&refs)
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<Task> {
        let visible = self.visible();
        let refs: Vec<&Task> = visible.iter().collect();
        overdue_tasks(&refs, now).into_iter().cloned().collect()
    }

    pub fn assignable_users(&self) -> Vec<User> {
        let users = self.stores.users.items();
        assignable_users(&users).into_iter().cloned().collect()
    }

    fn task(&self, id: &str) -> ScreenResult<Task> {
        self.stores.tasks.get(id).ok_or_else(|| {
            ScreenError::new(ErrorKind::Action, Message::ProcessingError, self.session.language)
                .with_detail(format!("tasks/{} not found", id))
        })
    }

    /// Create a pending task from the form, stamped with its creator.
    pub async fn create(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::CreateTask)?;
        let draft = TaskDraft {
            status: TaskStatus::Pending,
            assigned_by: Some(self.session.user.name.clone()),
            created_at: Some(Utc::now().to_rfc3339()),
            comments: Vec::new(),
            ..self.draft.clone()
        };
        let task = self
            .stores
            .tasks
            .create(&draft)
            .await
            .map_err(|e| self.session.failed(&e))?;
        debug!("[Tasks] created {} for {}", task.id, task.assigned_to);
        self.draft = TaskDraft::default();
        Ok(Message::TaskCreated)
    }

    pub async fn change_status(&self, id: &str, status: TaskStatus) -> ScreenResult<Message> {
        self.session.require(Action::UpdateTask)?;
        let patch = TaskPatch {
            status: Some(status),
            ..Default::default()
        };
        self.stores
            .tasks
            .update(id, &patch)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemSaved)
    }

    /// Append a comment; existing comments are sent back unchanged.
    pub async fn add_comment(&self, id: &str, text: &str) -> ScreenResult<Message> {
        self.session.require(Action::UpdateTask)?;
        if text.trim().is_empty() {
            return Err(self.session.invalid(Message::FillRequiredFields));
        }
        let task = self.task(id)?;
        let mut comments = task.comments;
        comments.push(TaskComment::new(&self.session.user.name, text));
        let patch = TaskPatch {
            comments: Some(comments),
            ..Default::default()
        };
        self.stores
            .tasks
            .update(id, &patch)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::CommentAdded)
    }

    pub async fn delete(&self, id: &str) -> ScreenResult<Message> {
        self.session.require(Action::DeleteTask)?;
        self.stores
            .tasks
            .remove(id)
            .await
            .map_err(|e| self.session.failed(&e))?;
        Ok(Message::ItemDeleted)
    }

    pub fn export_csv(&self) -> ExportResult<String> {
        to_csv(&task_records(&self.tasks()))
    }

    pub fn report(&self) -> String {
        let tasks = self.tasks();
        let refs: Vec<&Task> = tasks.iter().collect();
        task_report(&refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, UserRole};
    use crate::screens::testing;
    use chrono::Duration;

    fn draft(assignee: &str, due: &str) -> TaskDraft {
        TaskDraft {
            title: "Refill water troughs".into(),
            description: "All eastern enclosures".into(),
            assigned_to: assignee.into(),
            priority: TaskPriority::Medium,
            due_date: due.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_zookeeper_sees_own_tasks() {
        let (_, stores) = testing::seeded();
        let mut admin = TaskScreen::new(stores.clone(), testing::session(UserRole::Admin));
        admin.load().await;
        admin.draft = draft("Sunita Devi", "2030-01-01");
        admin.create().await.unwrap();

        assert_eq!(admin.counts().total, 2);
        let keeper = TaskScreen::new(stores, testing::session(UserRole::Zookeeper));
        let mine = keeper.tasks();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].assigned_to, "Rajesh Kumar");
    }

    #[tokio::test]
    async fn test_create_stamps_creator() {
        let (_, stores) = testing::seeded();
        let mut screen = TaskScreen::new(stores.clone(), testing::session(UserRole::Admin));
        screen.load().await;
        assert_eq!(screen.create().await.unwrap_err().kind, ErrorKind::Validation);

        screen.draft = draft("Rajesh Kumar", "2030-01-01");
        assert_eq!(screen.create().await.unwrap(), Message::TaskCreated);
        let newest = screen.tasks()[0].clone();
        assert_eq!(newest.title, "Refill water troughs");
        assert_eq!(newest.assigned_by.as_deref(), Some("Priya Sharma"));
        assert_eq!(newest.status, TaskStatus::Pending);
        assert_eq!(screen.draft, TaskDraft::default());
    }

    #[tokio::test]
    async fn test_only_admin_creates_and_deletes() {
        let (_, stores) = testing::seeded();
        let mut screen = TaskScreen::new(stores, testing::session(UserRole::Vet));
        screen.draft = draft("Rajesh Kumar", "2030-01-01");
        assert_eq!(screen.create().await.unwrap_err().kind, ErrorKind::Permission);
        assert_eq!(screen.delete("task-1").await.unwrap_err().kind, ErrorKind::Permission);
    }

    #[tokio::test]
    async fn test_status_tabs_and_overdue() {
        let (_, stores) = testing::seeded();
        let mut screen = TaskScreen::new(stores, testing::session(UserRole::Zookeeper));
        screen.load().await;
        let later = Utc::now() + Duration::days(10);
        assert_eq!(screen.overdue(later).len(), 1);

        screen.change_status("task-1", TaskStatus::Completed).await.unwrap();
        screen.tab = TaskTab::Status(TaskStatus::Pending);
        assert!(screen.tasks().is_empty());
        screen.tab = TaskTab::Status(TaskStatus::Completed);
        assert_eq!(screen.tasks().len(), 1);
        assert!(screen.overdue(later).is_empty());
        assert_eq!(screen.counts().completed, 1);
    }

    #[tokio::test]
    async fn test_comments_append() {
        let (_, stores) = testing::seeded();
        let screen = TaskScreen::new(stores.clone(), testing::session(UserRole::Zookeeper));
        screen.load().await;
        assert!(screen.add_comment("task-1", "   ").await.is_err());
        screen.add_comment("task-1", "Started on the north side").await.unwrap();
        screen.add_comment("task-1", "Done").await.unwrap();

        let comments = stores.tasks.get("task-1").unwrap().comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "Started on the north side");
        assert_eq!(comments[1].author, "Rajesh Kumar");
    }

    #[tokio::test]
    async fn test_assignable_and_exports() {
        let (_, stores) = testing::seeded();
        let screen = TaskScreen::new(stores, testing::session(UserRole::Admin));
        screen.load().await;
        assert_eq!(screen.assignable_users().len(), 3);
        let csv = screen.export_csv().unwrap();
        assert!(csv.contains("Deep clean enclosure A-12"));
        assert!(screen.report().contains("Deep clean enclosure A-12"));
    }
}
