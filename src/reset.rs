use crate::clock::{day_key, local_now, next_midnight, until};
use crate::config::ReminderMode;
use crate::models::AppData;
use crate::reminders::reschedule;
use crate::state::AppState;
use crate::timers::TimerKey;
use chrono::NaiveDateTime;
use tracing::{debug, error, info};

/// Zeroes the day's progress when the last reset happened on another day.
/// Returns whether anything changed.
pub fn maybe_reset_for_new_day(data: &mut AppData, today: &str) -> bool {
    if data.last_reset.as_deref() == Some(today) {
        return false;
    }
    reset_today(data, today);
    true
}

pub fn reset_today(data: &mut AppData, today: &str) {
    data.total_consumed = 0;
    data.last_reset = Some(today.to_string());
}

/// Keeps one task alive that resets progress at every local midnight. The
/// delay is recomputed from the wall clock on each pass.
pub fn arm_midnight_reset(state: &AppState) {
    arm_midnight_reset_with(state, local_now);
}

fn arm_midnight_reset_with<C>(state: &AppState, clock: C)
where
    C: Fn() -> NaiveDateTime + Send + 'static,
{
    state
        .timers
        .spawn(TimerKey::MidnightReset, midnight_loop(state.clone(), clock));
}

async fn midnight_loop<C>(state: AppState, clock: C)
where
    C: Fn() -> NaiveDateTime + Send + 'static,
{
    loop {
        let armed_at = clock();
        tokio::time::sleep(until(armed_at, next_midnight(armed_at))).await;
        let woke_at = clock();
        if !crossed_midnight(armed_at, woke_at) {
            // The sleep is monotonic and the wall clock is not (DST, NTP
            // steps). Waking early just re-arms for the remaining gap.
            debug!("midnight timer woke at {woke_at}, still {}", day_key(woke_at));
            continue;
        }
        run_midnight_reset(&state, woke_at).await;
    }
}

fn crossed_midnight(armed_at: NaiveDateTime, woke_at: NaiveDateTime) -> bool {
    day_key(woke_at) != day_key(armed_at)
}

async fn run_midnight_reset(state: &AppState, now: NaiveDateTime) {
    let today = day_key(now);
    let mut data = state.data.lock().await;
    reset_today(&mut data, &today);
    if data.reminders_enabled && state.config.reminder_mode == ReminderMode::Enumerate {
        reschedule(state, &mut data, now);
    }
    match state.persist(&data).await {
        Ok(()) => info!("daily progress reset for {today}"),
        Err(err) => error!("failed to persist midnight reset: {err}"),
    }
}
