//! Task models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{require, Collection, Resource, Validate, ValidationError};

/// Task priority, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown task priority: {}", other)),
        }
    }
}

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

/// A comment on a task. Comments are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub timestamp: String,
}

impl TaskComment {
    pub fn new(author: &str, text: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.to_string(),
            text: text.trim().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// A unit of work assigned to a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
    #[serde(default)]
    pub attachments: Vec<Value>,
}

impl Resource for Task {
    const COLLECTION: Collection = Collection::Tasks;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Task {
    /// Past its due date and not completed.
    ///
    /// Date-only due dates are due at midnight UTC that day. Unparseable
    /// dates never count as overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.status == TaskStatus::Completed {
            return false;
        }
        match parse_due(&self.due_date) {
            Some(due) => due < now,
            None => false,
        }
    }
}

fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0).map(|start| start.and_utc())
}

/// New-task form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_id: Option<String>,
    pub priority: TaskPriority,
    pub due_date: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub comments: Vec<TaskComment>,
    pub attachments: Vec<Value>,
}

impl Validate for TaskDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("assignedTo", &self.assigned_to)?;
        require("dueDate", &self.due_date)?;
        Ok(())
    }
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<TaskComment>>,
}
