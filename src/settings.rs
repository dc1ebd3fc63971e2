use crate::clock::{DEFAULT_WINDOW_END, DEFAULT_WINDOW_START};
use crate::models::{AppData, SettingsForm};
use tracing::debug;

/// Which numeric fields were taken from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsOutcome {
    pub goal_accepted: bool,
    pub interval_accepted: bool,
}

/// Commits the form into `data`. A goal or interval that does not parse to a
/// positive number leaves the stored value in place without complaint.
pub fn apply_settings(data: &mut AppData, form: &SettingsForm) -> SettingsOutcome {
    let mut outcome = SettingsOutcome::default();

    match form.daily_goal.as_deref().and_then(parse_goal) {
        Some(goal) => {
            data.daily_goal = goal;
            outcome.goal_accepted = true;
        }
        None => debug!(input = ?form.daily_goal, "keeping daily goal {}", data.daily_goal),
    }

    match form.interval.as_deref().and_then(parse_interval) {
        Some(interval) => {
            data.reminder_interval = interval;
            outcome.interval_accepted = true;
        }
        None => debug!(input = ?form.interval, "keeping reminder interval {}", data.reminder_interval),
    }

    data.start_window_enabled = form.start_window_enabled;
    data.window_start = non_empty_or(form.window_start.as_deref(), DEFAULT_WINDOW_START);
    data.window_end = non_empty_or(form.window_end.as_deref(), DEFAULT_WINDOW_END);

    outcome
}

fn parse_goal(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|goal| *goal > 0)
}

fn parse_interval(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|interval| interval.is_finite() && *interval > 0.0)
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}
