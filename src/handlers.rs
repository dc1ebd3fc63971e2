use crate::clock::{day_key, local_now};
use crate::config::ReminderMode;
use crate::errors::AppError;
use crate::models::{
    AppData, EnableRemindersRequest, EnableRemindersResponse, LogRequest, LogResponse,
    NotificationsQuery, NotificationsResponse, SettingsForm, SettingsView, StateResponse,
};
use crate::notify::Permission;
use crate::progress::present;
use crate::reminders::{MISSING_INTERVAL, clear_countdown, reminder_view, reschedule};
use crate::reset::reset_today;
use crate::scheduler::interval_step;
use crate::settings::apply_settings;
use crate::shortcut::shortcut_url;
use crate::state::AppState;
use crate::ui::{SERVICE_WORKER_JS, render_index};
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use chrono::NaiveDateTime;
use tracing::info;

const PERMISSION_NEEDED: &str = "Please allow notifications to get reminders!";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&build_state(&state, &data, local_now())))
}

pub async fn service_worker() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], SERVICE_WORKER_JS)
}

pub async fn get_state(State(state): State<AppState>) -> Result<Json<StateResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_state(&state, &data, local_now())))
}

pub async fn log_water(
    State(state): State<AppState>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<LogResponse>, AppError> {
    let amount = u64::try_from(payload.amount)
        .ok()
        .filter(|amount| *amount > 0)
        .ok_or_else(|| AppError::bad_request("amount must be a positive number of ml"))?;

    let mut data = state.data.lock().await;
    data.total_consumed = data.total_consumed.saturating_add(amount);
    state.persist(&data).await?;
    info!(amount, total = data.total_consumed, "water logged");

    Ok(Json(LogResponse {
        state: build_state(&state, &data, local_now()),
        shortcut_url: shortcut_url(&state.config.shortcut_name, amount),
    }))
}

pub async fn save_settings(
    State(state): State<AppState>,
    Json(form): Json<SettingsForm>,
) -> Result<Json<StateResponse>, AppError> {
    let now = local_now();
    let mut data = state.data.lock().await;
    let outcome = apply_settings(&mut data, &form);
    if data.reminders_enabled {
        reschedule(&state, &mut data, now);
    }
    state.persist(&data).await?;
    info!(?outcome, "settings saved");

    Ok(Json(build_state(&state, &data, now)))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<StateResponse>, AppError> {
    let now = local_now();
    let mut data = state.data.lock().await;
    reset_today(&mut data, &day_key(now));
    if state.config.reminder_mode == ReminderMode::Countdown {
        clear_countdown(&state, &mut data);
    }
    state.persist(&data).await?;
    info!("progress reset for today");

    Ok(Json(build_state(&state, &data, now)))
}

pub async fn enable_reminders(
    State(state): State<AppState>,
    Json(payload): Json<EnableRemindersRequest>,
) -> Result<Json<EnableRemindersResponse>, AppError> {
    let now = local_now();
    let permission = Permission::from_browser(&payload.permission);
    let mut data = state.data.lock().await;
    data.notification_permission = permission;
    state.notifications.lock().await.set_permission(permission);

    if interval_step(data.reminder_interval, state.config.interval_unit).is_none() {
        state.persist(&data).await?;
        return Ok(Json(EnableRemindersResponse {
            state: build_state(&state, &data, now),
            scheduled: 0,
            message: Some(MISSING_INTERVAL.to_string()),
        }));
    }

    data.reminders_enabled = true;
    let outcome = reschedule(&state, &mut data, now);
    state.persist(&data).await?;

    let message = match permission {
        Permission::Granted => match state.config.reminder_mode {
            ReminderMode::Enumerate => "Today's reminders scheduled.",
            ReminderMode::Countdown => "Reminder set.",
        },
        Permission::Default | Permission::Denied => PERMISSION_NEEDED,
    };

    Ok(Json(EnableRemindersResponse {
        state: build_state(&state, &data, now),
        scheduled: outcome.scheduled,
        message: Some(message.to_string()),
    }))
}

pub async fn notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Json<NotificationsResponse> {
    let center = state.notifications.lock().await;
    Json(NotificationsResponse {
        notifications: center.since(query.after.unwrap_or(0)),
    })
}

fn build_state(state: &AppState, data: &AppData, now: NaiveDateTime) -> StateResponse {
    StateResponse {
        date: day_key(now),
        progress: present(data),
        settings: SettingsView {
            daily_goal: data.daily_goal,
            interval: data.reminder_interval,
            interval_unit: state.config.interval_unit,
            start_window_enabled: data.start_window_enabled,
            window_start: data.window_start.clone(),
            window_end: data.window_end.clone(),
        },
        reminder: reminder_view(state, data, now),
    }
}
