use crate::clock::{format_instant, parse_instant};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::AppData;
use crate::notify::Permission;
use serde_json::Value;
use std::{collections::BTreeMap, env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub const KEY_DAILY_GOAL: &str = "dailyGoal";
pub const KEY_TOTAL_CONSUMED: &str = "totalConsumed";
pub const KEY_START_WINDOW_ENABLED: &str = "startWindowEnabled";
pub const KEY_WINDOW_START: &str = "windowStart";
pub const KEY_WINDOW_END: &str = "windowEnd";
pub const KEY_LAST_RESET: &str = "lastResetISO";
pub const KEY_NEXT_REMINDER: &str = "nextReminder";
pub const KEY_REMINDERS_ENABLED: &str = "remindersEnabled";
pub const KEY_NOTIFICATION_PERMISSION: &str = "notificationPermission";

pub type Entries = BTreeMap<String, String>;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

pub async fn load_data(path: &Path, config: &Config) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, Value>>(&bytes) {
            Ok(raw) => from_entries(&stringify(raw), config),
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::with_goal(config.default_goal)
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            AppData::with_goal(config.default_goal)
        }
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::with_goal(config.default_goal)
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData, config: &Config) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(&to_entries(data, config)).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Flattens the record into string values, one key per field.
pub fn to_entries(data: &AppData, config: &Config) -> Entries {
    let mut entries = Entries::new();
    let mut put = |key: &str, value: String| {
        entries.insert(key.to_string(), value);
    };

    put(KEY_DAILY_GOAL, data.daily_goal.to_string());
    put(KEY_TOTAL_CONSUMED, data.total_consumed.to_string());
    put(config.interval_unit.storage_key(), data.reminder_interval.to_string());
    put(KEY_START_WINDOW_ENABLED, data.start_window_enabled.to_string());
    put(KEY_WINDOW_START, data.window_start.clone());
    put(KEY_WINDOW_END, data.window_end.clone());
    put(KEY_LAST_RESET, data.last_reset.clone().unwrap_or_else(|| "null".to_string()));
    put(
        KEY_NEXT_REMINDER,
        data.next_reminder.map(format_instant).unwrap_or_else(|| "null".to_string()),
    );
    put(KEY_REMINDERS_ENABLED, data.reminders_enabled.to_string());
    put(KEY_NOTIFICATION_PERMISSION, data.notification_permission.as_str().to_string());
    entries
}

/// Each key is parsed on its own; anything absent or unparseable takes the
/// default for that field only.
pub fn from_entries(entries: &Entries, config: &Config) -> AppData {
    let defaults = AppData::with_goal(config.default_goal);
    let get = |key: &str| {
        entries
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty() && *value != "null")
    };

    AppData {
        daily_goal: get(KEY_DAILY_GOAL)
            .and_then(|value| value.parse().ok())
            .filter(|goal| *goal > 0)
            .unwrap_or(defaults.daily_goal),
        total_consumed: get(KEY_TOTAL_CONSUMED)
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.total_consumed),
        reminder_interval: get(config.interval_unit.storage_key())
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|interval| interval.is_finite() && *interval > 0.0)
            .unwrap_or(defaults.reminder_interval),
        start_window_enabled: get(KEY_START_WINDOW_ENABLED)
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.start_window_enabled),
        window_start: get(KEY_WINDOW_START)
            .map(str::to_string)
            .unwrap_or(defaults.window_start),
        window_end: get(KEY_WINDOW_END)
            .map(str::to_string)
            .unwrap_or(defaults.window_end),
        last_reset: get(KEY_LAST_RESET).map(str::to_string),
        next_reminder: get(KEY_NEXT_REMINDER).and_then(parse_instant),
        reminders_enabled: get(KEY_REMINDERS_ENABLED)
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.reminders_enabled),
        notification_permission: get(KEY_NOTIFICATION_PERMISSION)
            .map(Permission::from_browser)
            .unwrap_or(defaults.notification_permission),
    }
}

fn stringify(raw: BTreeMap<String, Value>) -> Entries {
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) => text,
                Value::Null => "null".to_string(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}
