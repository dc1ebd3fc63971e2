use crate::clock::{format_hhmm, format_instant, local_now, until};
use crate::config::ReminderMode;
use crate::models::{AppData, ReminderView};
use crate::scheduler::{
    ReminderPlan, countdown_target, enumerate_reminders, minutes_remaining, preview_next,
    resume_countdown,
};
use crate::state::AppState;
use crate::timers::TimerKey;
use chrono::NaiveDateTime;
use tracing::{error, info};

pub const MISSING_INTERVAL: &str = "Set a reminder interval in Settings first.";

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    pub scheduled: usize,
    pub next: Option<NaiveDateTime>,
}

/// Drops every armed reminder, then arms the set the current settings call
/// for. Running it twice in a row leaves only the second set.
pub fn reschedule(state: &AppState, data: &mut AppData, now: NaiveDateTime) -> ScheduleOutcome {
    let cancelled = state.timers.cancel_reminders();
    let plan = ReminderPlan::from_data(data, state.config.interval_unit, now);

    let outcome = match state.config.reminder_mode {
        ReminderMode::Enumerate => {
            let instants = enumerate_reminders(&plan, now);
            for (index, instant) in instants.iter().enumerate() {
                let task_state = state.clone();
                state.timers.arm(
                    TimerKey::Reminder(index),
                    until(now, *instant),
                    *instant,
                    async move { fire_reminder(task_state).await },
                );
            }
            ScheduleOutcome {
                scheduled: instants.len(),
                next: instants.first().copied(),
            }
        }
        ReminderMode::Countdown => {
            data.next_reminder = countdown_target(&plan, now);
            if let Some(target) = data.next_reminder {
                arm_countdown(state, target, now);
            }
            ScheduleOutcome {
                scheduled: usize::from(data.next_reminder.is_some()),
                next: data.next_reminder,
            }
        }
    };

    info!(
        cancelled,
        scheduled = outcome.scheduled,
        "reminders rescheduled, next at {}",
        format_hhmm(outcome.next)
    );
    outcome
}

/// Re-arms whatever survived a restart.
pub fn resume(state: &AppState, data: &mut AppData, now: NaiveDateTime) {
    match state.config.reminder_mode {
        ReminderMode::Enumerate => {
            if data.reminders_enabled {
                reschedule(state, data, now);
            }
        }
        ReminderMode::Countdown => {
            data.next_reminder = resume_countdown(data.next_reminder, now);
            match data.next_reminder {
                Some(target) => {
                    arm_countdown(state, target, now);
                    info!("resumed countdown for {}", format_hhmm(Some(target)));
                }
                None => {
                    state.timers.cancel(TimerKey::Countdown);
                }
            }
        }
    }
}

pub fn clear_countdown(state: &AppState, data: &mut AppData) {
    state.timers.cancel(TimerKey::Countdown);
    data.next_reminder = None;
}

pub fn next_reminder(state: &AppState, data: &AppData, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let plan = ReminderPlan::from_data(data, state.config.interval_unit, now);
    if plan.is_disabled() {
        return None;
    }
    match state.config.reminder_mode {
        ReminderMode::Enumerate => state
            .timers
            .next_deadline(now)
            .or_else(|| preview_next(&plan, now)),
        ReminderMode::Countdown => resume_countdown(data.next_reminder, now),
    }
}

pub fn reminder_view(state: &AppState, data: &AppData, now: NaiveDateTime) -> ReminderView {
    let next = next_reminder(state, data, now);
    ReminderView {
        mode: state.config.reminder_mode,
        enabled: data.reminders_enabled,
        next_label: format_hhmm(next),
        next_at: next.map(format_instant),
        minutes_remaining: next.map(|target| minutes_remaining(target, now)),
        scheduled_count: state.timers.pending_reminders(),
    }
}

fn arm_countdown(state: &AppState, target: NaiveDateTime, now: NaiveDateTime) {
    let task_state = state.clone();
    state.timers.arm(
        TimerKey::Countdown,
        until(now, target),
        target,
        async move { fire_countdown(task_state).await },
    );
}

async fn fire_reminder(state: AppState) {
    state.notifications.lock().await.fire_reminder(local_now());
}

async fn fire_countdown(state: AppState) {
    let mut data = state.data.lock().await;
    data.next_reminder = None;
    if let Err(err) = state.persist(&data).await {
        error!("failed to persist after countdown: {err}");
    }
    state.notifications.lock().await.fire_reminder(local_now());
}
