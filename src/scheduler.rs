//! Reminder planning. Everything here is a pure function of the stored
//! settings and a wall-clock instant; arming the timers happens in
//! `reminders`.

use crate::clock::{WindowBounds, window_bounds_for_today};
use crate::config::IntervalUnit;
use crate::models::AppData;
use chrono::{Duration, NaiveDateTime};

/// Horizon for reminders when no window bounds the day.
pub const UNBOUNDED_HORIZON_HOURS: i64 = 12;

/// Upper bound on instants planned in one pass, one per minute for a day.
pub const MAX_INSTANTS: usize = 1440;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReminderPlan {
    pub step: Option<Duration>,
    pub window: Option<WindowBounds>,
}

impl ReminderPlan {
    pub fn from_data(data: &AppData, unit: IntervalUnit, now: NaiveDateTime) -> Self {
        let window = data
            .start_window_enabled
            .then(|| window_bounds_for_today(&data.window_start, &data.window_end, now));
        Self {
            step: interval_step(data.reminder_interval, unit),
            window,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.step.is_none()
    }
}

/// Interval converted to a timer step; `None` for anything that would not
/// advance the clock.
pub fn interval_step(interval: f64, unit: IntervalUnit) -> Option<Duration> {
    if !interval.is_finite() || interval <= 0.0 {
        return None;
    }
    let millis = (interval * unit.millis()).round();
    if millis < 1.0 || millis > i64::MAX as f64 {
        return None;
    }
    Some(Duration::milliseconds(millis as i64))
}

/// Every reminder instant left for today, strictly after `now`.
///
/// With a window, candidates start at the later of `now` and the window start
/// and stop before the window end. Without one they stop once more than
/// [`UNBOUNDED_HORIZON_HOURS`] past `now`.
pub fn enumerate_reminders(plan: &ReminderPlan, now: NaiveDateTime) -> Vec<NaiveDateTime> {
    let Some(step) = plan.step else {
        return Vec::new();
    };
    let horizon = now + Duration::hours(UNBOUNDED_HORIZON_HOURS);

    let mut next = match plan.window {
        Some(window) if now < window.start => window.start,
        _ => now,
    };
    let mut instants = Vec::new();
    while instants.len() < MAX_INSTANTS {
        let past_end = match plan.window {
            Some(window) => next >= window.end,
            None => next > horizon,
        };
        if past_end {
            break;
        }
        if next > now {
            instants.push(next);
        }
        match next.checked_add_signed(step) {
            Some(advanced) => next = advanced,
            None => break,
        }
    }
    instants
}

/// First instant the enumeration would arm right now.
pub fn preview_next(plan: &ReminderPlan, now: NaiveDateTime) -> Option<NaiveDateTime> {
    enumerate_reminders(plan, now).into_iter().next()
}

pub fn countdown_target(plan: &ReminderPlan, now: NaiveDateTime) -> Option<NaiveDateTime> {
    plan.step.and_then(|step| now.checked_add_signed(step))
}

/// A persisted countdown survives a restart only while still ahead of `now`.
pub fn resume_countdown(
    persisted: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    persisted.filter(|target| *target > now)
}

pub fn minutes_remaining(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let seconds = (target - now).num_seconds().max(0);
    (seconds + 59) / 60
}
