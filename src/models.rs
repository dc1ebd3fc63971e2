use crate::clock::{DEFAULT_WINDOW_END, DEFAULT_WINDOW_START};
use crate::config::{IntervalUnit, ReminderMode};
use crate::notify::{Notification, Permission};
use crate::progress::ProgressView;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The whole persisted record. Mirrored into the key-value store after every
/// mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppData {
    pub daily_goal: u64,
    pub total_consumed: u64,
    pub reminder_interval: f64,
    pub start_window_enabled: bool,
    pub window_start: String,
    pub window_end: String,
    pub last_reset: Option<String>,
    pub next_reminder: Option<NaiveDateTime>,
    pub reminders_enabled: bool,
    pub notification_permission: Permission,
}

impl AppData {
    pub fn with_goal(daily_goal: u64) -> Self {
        Self {
            daily_goal,
            ..Self::default()
        }
    }
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            daily_goal: 0,
            total_consumed: 0,
            reminder_interval: 0.0,
            start_window_enabled: false,
            window_start: DEFAULT_WINDOW_START.to_string(),
            window_end: DEFAULT_WINDOW_END.to_string(),
            last_reset: None,
            next_reminder: None,
            reminders_enabled: false,
            notification_permission: Permission::Default,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub amount: i64,
}

/// Raw form fields, as typed by the user.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub daily_goal: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub start_window_enabled: bool,
    #[serde(default)]
    pub window_start: Option<String>,
    #[serde(default)]
    pub window_end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnableRemindersRequest {
    #[serde(default)]
    pub permission: String,
}

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub after: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub daily_goal: u64,
    pub interval: f64,
    pub interval_unit: IntervalUnit,
    pub start_window_enabled: bool,
    pub window_start: String,
    pub window_end: String,
}

#[derive(Debug, Serialize)]
pub struct ReminderView {
    pub mode: ReminderMode,
    pub enabled: bool,
    pub next_label: String,
    pub next_at: Option<String>,
    pub minutes_remaining: Option<i64>,
    pub scheduled_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub date: String,
    pub progress: ProgressView,
    pub settings: SettingsView,
    pub reminder: ReminderView,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    #[serde(flatten)]
    pub state: StateResponse,
    pub shortcut_url: String,
}

#[derive(Debug, Serialize)]
pub struct EnableRemindersResponse {
    #[serde(flatten)]
    pub state: StateResponse,
    pub scheduled: usize,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}
