//! Local notifications.
//!
//! [`NotificationCenter`] owns the user's notification switches and the
//! platform permission. Delivery goes through a [`NotificationSink`], so the
//! same gating logic drives a desktop notifier, a log, or a test recorder.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::i18n::{Language, Message};
use crate::models::{Alert, InventoryItem, Task};
use crate::prefs::{PreferenceStore, PrefsResult, NOTIFICATION_PERMISSION_KEY, NOTIFICATION_PREFERENCES_KEY};

/// Notification kinds the user can switch individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Sos,
    Task,
    Health,
    Feeding,
    Medication,
    Stock,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 6] = [
        NotificationCategory::Sos,
        NotificationCategory::Task,
        NotificationCategory::Health,
        NotificationCategory::Feeding,
        NotificationCategory::Medication,
        NotificationCategory::Stock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Sos => "sos",
            NotificationCategory::Task => "task",
            NotificationCategory::Health => "health",
            NotificationCategory::Feeding => "feeding",
            NotificationCategory::Medication => "medication",
            NotificationCategory::Stock => "stock",
        }
    }

    /// Platform tag; a newer notification with the same tag replaces the older one.
    pub fn tag(&self) -> String {
        format!("{}-notification", self.as_str())
    }

    /// Sample title and body for a test notification.
    pub fn template(&self, language: Language) -> (&'static str, &'static str) {
        use NotificationCategory::*;
        match (self, language) {
            (Sos, Language::En) => (
                "🚨 SOS Alert!",
                "Emergency reported for Simba - Lion. Immediate attention required!",
            ),
            (Sos, Language::Hi) => ("🚨 SOS अलर्ट!", "सिम्बा - शेर के लिए आपातकाल की सूचना। तत्काल ध्यान आवश्यक!"),
            (Task, Language::En) => (
                "📋 Task Reminder",
                "You have a pending task: Complete health checkup for Raja",
            ),
            (Task, Language::Hi) => ("📋 कार्य अनुस्मारक", "आपका लंबित कार्य: राजा के लिए स्वास्थ्य जांच पूरी करें"),
            (Health, Language::En) => (
                "🏥 Health Alert",
                "Mowgli the Tiger is showing signs of reduced appetite",
            ),
            (Health, Language::Hi) => ("🏥 स्वास्थ्य अलर्ट", "मोगली बाघ में भूख कम होने के लक्षण दिख रहे हैं"),
            (Feeding, Language::En) => (
                "🍖 Feeding Reminder",
                "Feeding time for Dumbo - Elephant. 120kg vegetables required.",
            ),
            (Feeding, Language::Hi) => ("🍖 भोजन अनुस्मारक", "डंबो - हाथी के लिए भोजन का समय। 120 किलो सब्जियां आवश्यक।"),
            (Medication, Language::En) => (
                "💊 Medication Alert",
                "Time to administer antibiotics to Simba - 500mg dosage",
            ),
            (Medication, Language::Hi) => ("💊 दवा अलर्ट", "सिम्बा को एंटीबायोटिक्स देने का समय - 500mg खुराक"),
            (Stock, Language::En) => (
                "📦 Low Stock Alert",
                "Fish inventory is running low - only 30kg remaining",
            ),
            (Stock, Language::Hi) => ("📦 कम स्टॉक अलर्ट", "मछली का स्टॉक कम हो रहा है - केवल 30 किलो बचा है"),
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sos" => Ok(NotificationCategory::Sos),
            "task" | "tasks" => Ok(NotificationCategory::Task),
            "health" => Ok(NotificationCategory::Health),
            "feeding" => Ok(NotificationCategory::Feeding),
            "medication" | "medications" => Ok(NotificationCategory::Medication),
            "stock" | "lowstock" | "low-stock" => Ok(NotificationCategory::Stock),
            other => Err(format!("unknown notification category: {}", other)),
        }
    }
}

/// User switches: a master switch plus one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub enabled: bool,
    pub sos_alerts: bool,
    pub task_reminders: bool,
    pub health_alerts: bool,
    pub feeding_reminders: bool,
    pub medication_reminders: bool,
    pub low_stock_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: false,
            sos_alerts: true,
            task_reminders: true,
            health_alerts: true,
            feeding_reminders: true,
            medication_reminders: true,
            low_stock_alerts: true,
        }
    }
}

impl NotificationPreferences {
    fn slot(&mut self, category: NotificationCategory) -> &mut bool {
        match category {
            NotificationCategory::Sos => &mut self.sos_alerts,
            NotificationCategory::Task => &mut self.task_reminders,
            NotificationCategory::Health => &mut self.health_alerts,
            NotificationCategory::Feeding => &mut self.feeding_reminders,
            NotificationCategory::Medication => &mut self.medication_reminders,
            NotificationCategory::Stock => &mut self.low_stock_alerts,
        }
    }

    pub fn category_enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Sos => self.sos_alerts,
            NotificationCategory::Task => self.task_reminders,
            NotificationCategory::Health => self.health_alerts,
            NotificationCategory::Feeding => self.feeding_reminders,
            NotificationCategory::Medication => self.medication_reminders,
            NotificationCategory::Stock => self.low_stock_alerts,
        }
    }

    pub fn set_category(&mut self, category: NotificationCategory, on: bool) {
        *self.slot(category) = on;
    }
}

/// Platform permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Never asked
    #[default]
    Default,
    Granted,
    Denied,
}

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub category: Option<NotificationCategory>,
    pub title: String,
    pub body: String,
    pub tag: String,
    /// Stays on screen until dismissed
    pub require_interaction: bool,
}

impl Notification {
    pub fn new(category: NotificationCategory, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            category: Some(category),
            title: title.into(),
            body: body.into(),
            tag: category.tag(),
            require_interaction: category == NotificationCategory::Sos,
        }
    }
}

/// Platform notification backend.
pub trait NotificationSink: Send + Sync {
    /// Ask the platform for permission.
    fn request_permission(&self) -> NotificationPermission;

    /// Register background delivery once permission is granted.
    fn register_background(&self) -> Result<(), String>;

    fn show(&self, notification: &Notification);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    /// Permission answer to report
    pub grant: bool,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self { grant: true }
    }
}

impl NotificationSink for TracingSink {
    fn request_permission(&self) -> NotificationPermission {
        if self.grant {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        }
    }

    fn register_background(&self) -> Result<(), String> {
        Ok(())
    }

    fn show(&self, notification: &Notification) {
        info!(
            tag = %notification.tag,
            require_interaction = notification.require_interaction,
            "[Notify] {}: {}",
            notification.title,
            notification.body
        );
    }
}

/// Sink that keeps every shown notification in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    answer: Mutex<Option<NotificationPermission>>,
    shown: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    /// A sink that answers permission requests with `answer`.
    pub fn answering(answer: NotificationPermission) -> Self {
        Self {
            answer: Mutex::new(Some(answer)),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn request_permission(&self) -> NotificationPermission {
        self.answer
            .lock()
            .ok()
            .and_then(|a| *a)
            .unwrap_or(NotificationPermission::Denied)
    }

    fn register_background(&self) -> Result<(), String> {
        Ok(())
    }

    fn show(&self, notification: &Notification) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(notification.clone());
        }
    }
}

/// Notifications derived from current operational state.
///
/// Active SOS and health alerts, low-stock items and overdue tasks each
/// yield one notification.
pub fn reminders(alerts: &[Alert], inventory: &[InventoryItem], tasks: &[Task], now: DateTime<Utc>) -> Vec<Notification> {
    let mut out = Vec::new();
    for alert in alerts.iter().filter(|a| a.is_active()) {
        let category = match alert.kind.as_str() {
            "sos" => NotificationCategory::Sos,
            "health" => NotificationCategory::Health,
            _ => continue,
        };
        let title = match category {
            NotificationCategory::Sos => "🚨 SOS Alert!",
            _ => "🏥 Health Alert",
        };
        let body = match alert.animal_name.as_deref() {
            Some(name) => format!("{}: {}", name, alert.message),
            None => alert.message.clone(),
        };
        out.push(Notification::new(category, title, body));
    }
    for item in inventory.iter().filter(|i| i.is_low_stock()) {
        out.push(Notification::new(
            NotificationCategory::Stock,
            "📦 Low Stock Alert",
            format!(
                "{} is running low - only {} {} remaining",
                item.name,
                crate::models::format_number(item.quantity),
                item.unit
            ),
        ));
    }
    for task in tasks.iter().filter(|t| t.is_overdue(now)) {
        out.push(Notification::new(
            NotificationCategory::Task,
            "📋 Task Reminder",
            format!("Overdue task for {}: {}", task.assigned_to, task.title),
        ));
    }
    out
}

/// Notification switches, permission and delivery.
pub struct NotificationCenter<'a> {
    prefs: &'a PreferenceStore,
    sink: Arc<dyn NotificationSink>,
    language: Language,
    preferences: NotificationPreferences,
    permission: NotificationPermission,
}

impl<'a> NotificationCenter<'a> {
    /// Restore switches and permission from local preferences.
    pub fn new(prefs: &'a PreferenceStore, sink: Arc<dyn NotificationSink>, language: Language) -> PrefsResult<Self> {
        Ok(Self {
            preferences: prefs.get_or_default(NOTIFICATION_PREFERENCES_KEY)?,
            permission: prefs.get_or_default(NOTIFICATION_PERMISSION_KEY)?,
            prefs,
            sink,
            language,
        })
    }

    pub fn preferences(&self) -> NotificationPreferences {
        self.preferences
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn save(&self) -> PrefsResult<()> {
        self.prefs.set(NOTIFICATION_PREFERENCES_KEY, &self.preferences)
    }

    /// Ask the platform for permission.
    ///
    /// On grant, background delivery is registered, notifications are
    /// switched on and a welcome notification is shown.
    pub fn request_permission(&mut self) -> PrefsResult<Message> {
        self.permission = self.sink.request_permission();
        self.prefs.set(NOTIFICATION_PERMISSION_KEY, &self.permission)?;
        if self.permission != NotificationPermission::Granted {
            return Ok(Message::NotificationPermissionDenied);
        }

        if let Err(e) = self.sink.register_background() {
            warn!("[Notify] background registration failed: {}", e);
        }
        self.preferences.enabled = true;
        self.save()?;
        let body = match self.language {
            Language::En => "🦁 Notifications are now enabled!",
            Language::Hi => "🦁 सूचनाएं अब सक्षम हैं!",
        };
        self.sink.show(&Notification {
            category: None,
            title: "Jungle Safari".to_string(),
            body: body.to_string(),
            tag: "welcome-notification".to_string(),
            require_interaction: false,
        });
        Ok(Message::NotificationPermissionGranted)
    }

    /// Flip the master switch; enabling without permission asks for it first.
    pub fn toggle(&mut self) -> PrefsResult<Message> {
        if !self.preferences.enabled && self.permission != NotificationPermission::Granted {
            return self.request_permission();
        }
        self.preferences.enabled = !self.preferences.enabled;
        self.save()?;
        Ok(if self.preferences.enabled {
            Message::NotificationsEnabled
        } else {
            Message::NotificationsDisabled
        })
    }

    pub fn update_preference(&mut self, category: NotificationCategory, on: bool) -> PrefsResult<()> {
        self.preferences.set_category(category, on);
        self.save()
    }

    /// Show the sample notification of a category.
    pub fn send_test(&self, category: NotificationCategory) -> Message {
        if self.permission != NotificationPermission::Granted {
            return Message::EnableNotificationsFirst;
        }
        let (title, body) = category.template(self.language);
        self.sink.show(&Notification::new(category, title, body));
        Message::TestNotificationSent
    }

    /// Whether a notification would currently be shown.
    pub fn allows(&self, notification: &Notification) -> bool {
        self.permission == NotificationPermission::Granted
            && self.preferences.enabled
            && notification
                .category
                .map_or(true, |c| self.preferences.category_enabled(c))
    }

    /// Show a notification if permission, master switch and category allow.
    pub fn notify(&self, notification: &Notification) -> bool {
        if !self.allows(notification) {
            return false;
        }
        self.sink.show(notification);
        true
    }

    /// Derive and deliver reminders; returns how many were shown.
    pub fn dispatch_reminders(&self, alerts: &[Alert], inventory: &[InventoryItem], tasks: &[Task], now: DateTime<Utc>) -> usize {
        reminders(alerts, inventory, tasks, now)
            .iter()
            .filter(|n| self.notify(n))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InventoryCategory;

    fn center<'a>(prefs: &'a PreferenceStore, sink: Arc<RecordingSink>) -> NotificationCenter<'a> {
        NotificationCenter::new(prefs, sink, Language::En).unwrap()
    }

    fn low_item() -> InventoryItem {
        InventoryItem {
            id: "inv-1".into(),
            name: "Raw Meat".into(),
            category: InventoryCategory::Food,
            quantity: 40.0,
            unit: "kg".into(),
            min_threshold: 50.0,
            cost: 12.5,
            supplier: None,
            last_restocked: None,
            expiry_date: None,
        }
    }

    #[test]
    fn test_defaults() {
        let prefs = NotificationPreferences::default();
        assert!(!prefs.enabled);
        for c in NotificationCategory::ALL {
            assert!(prefs.category_enabled(c));
        }
        let json = serde_json::to_value(prefs).unwrap();
        assert_eq!(json["lowStockAlerts"], true);
    }

    #[test]
    fn test_toggle_without_permission_requests_it() {
        let store = PreferenceStore::open_in_memory().unwrap();
        let sink = Arc::new(RecordingSink::answering(NotificationPermission::Granted));
        let mut center = center(&store, sink.clone());

        assert_eq!(center.toggle().unwrap(), Message::NotificationPermissionGranted);
        assert!(center.preferences().enabled);
        assert_eq!(sink.shown().len(), 1);
        assert_eq!(sink.shown()[0].title, "Jungle Safari");

        assert_eq!(center.toggle().unwrap(), Message::NotificationsDisabled);
        assert_eq!(center.toggle().unwrap(), Message::NotificationsEnabled);
    }

    #[test]
    fn test_denied_permission_stays_disabled() {
        let store = PreferenceStore::open_in_memory().unwrap();
        let sink = Arc::new(RecordingSink::answering(NotificationPermission::Denied));
        let mut center = center(&store, sink.clone());
        assert_eq!(center.toggle().unwrap(), Message::NotificationPermissionDenied);
        assert!(!center.preferences().enabled);
        assert_eq!(center.send_test(NotificationCategory::Sos), Message::EnableNotificationsFirst);
        assert!(sink.shown().is_empty());
    }

    #[test]
    fn test_notify_gating() {
        let store = PreferenceStore::open_in_memory().unwrap();
        let sink = Arc::new(RecordingSink::answering(NotificationPermission::Granted));
        let mut center = center(&store, sink.clone());
        let (title, body) = NotificationCategory::Stock.template(Language::En);
        let n = Notification::new(NotificationCategory::Stock, title, body);

        assert!(!center.notify(&n));
        center.request_permission().unwrap();
        assert!(center.notify(&n));
        center.update_preference(NotificationCategory::Stock, false).unwrap();
        assert!(!center.notify(&n));
        assert_eq!(sink.shown().len(), 2);
    }

    #[test]
    fn test_preferences_persist() {
        let store = PreferenceStore::open_in_memory().unwrap();
        let sink = Arc::new(RecordingSink::answering(NotificationPermission::Granted));
        {
            let mut center = center(&store, sink.clone());
            center.request_permission().unwrap();
            center.update_preference(NotificationCategory::Feeding, false).unwrap();
        }
        let center = center(&store, sink);
        assert_eq!(center.permission(), NotificationPermission::Granted);
        assert!(center.preferences().enabled);
        assert!(!center.preferences().feeding_reminders);
    }

    #[test]
    fn test_sos_template_requires_interaction() {
        let store = PreferenceStore::open_in_memory().unwrap();
        let sink = Arc::new(RecordingSink::answering(NotificationPermission::Granted));
        let mut center = center(&store, sink.clone());
        center.request_permission().unwrap();
        assert_eq!(center.send_test(NotificationCategory::Sos), Message::TestNotificationSent);
        let shown = sink.shown();
        let sos = shown.last().unwrap();
        assert_eq!(sos.tag, "sos-notification");
        assert!(sos.require_interaction);
    }

    #[test]
    fn test_reminders_from_state() {
        let alert: Alert = serde_json::from_value(serde_json::json!({
            "id": "alert-1", "type": "sos", "message": "Limping", "animalName": "Ganga", "status": "active"
        }))
        .unwrap();
        let resolved: Alert = serde_json::from_value(serde_json::json!({
            "id": "alert-2", "type": "health", "message": "Old", "status": "resolved"
        }))
        .unwrap();
        let out = reminders(&[alert, resolved], &[low_item()], &[], Utc::now());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].category, Some(NotificationCategory::Sos));
        assert_eq!(out[0].body, "Ganga: Limping");
        assert_eq!(out[1].body, "Raw Meat is running low - only 40 kg remaining");
    }
}
