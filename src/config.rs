use crate::storage::resolve_data_path;
use serde::Serialize;
use std::{env, path::PathBuf, str::FromStr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SHORTCUT_NAME: &str = "LogWater";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderMode {
    /// Every remaining reminder of the day is armed up front.
    #[default]
    Enumerate,
    /// One reminder at a time, `interval` from the moment it is armed.
    Countdown,
}

impl FromStr for ReminderMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "enumerate" => Ok(Self::Enumerate),
            "countdown" => Ok(Self::Countdown),
            other => Err(format!("unknown reminder mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    #[default]
    Minutes,
    Hours,
}

impl IntervalUnit {
    pub fn millis(self) -> f64 {
        match self {
            Self::Minutes => 60_000.0,
            Self::Hours => 3_600_000.0,
        }
    }

    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Minutes => "intervalMinutes",
            Self::Hours => "intervalHours",
        }
    }
}

impl FromStr for IntervalUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minutes" | "minute" | "min" => Ok(Self::Minutes),
            "hours" | "hour" | "h" => Ok(Self::Hours),
            other => Err(format!("unknown interval unit '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub reminder_mode: ReminderMode,
    pub interval_unit: IntervalUnit,
    pub default_goal: u64,
    pub shortcut_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from("data/state.json"),
            reminder_mode: ReminderMode::default(),
            interval_unit: IntervalUnit::default(),
            default_goal: 0,
            shortcut_name: DEFAULT_SHORTCUT_NAME.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let defaults = Self::default();
        Ok(Self {
            port: env_or("PORT", defaults.port),
            data_path: resolve_data_path()?,
            reminder_mode: env_or("REMINDER_MODE", defaults.reminder_mode),
            interval_unit: env_or("REMINDER_INTERVAL_UNIT", defaults.interval_unit),
            default_goal: env_or("DEFAULT_DAILY_GOAL", defaults.default_goal),
            shortcut_name: env::var("SHORTCUT_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.shortcut_name),
        })
    }
}

fn env_or<T>(key: &str, fallback: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|err| {
            warn!("ignoring {key}={raw:?}: {err}");
            fallback
        }),
        Err(_) => fallback,
    }
}
