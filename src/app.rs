use crate::clock::{day_key, local_now};
use crate::errors::AppError;
use crate::handlers;
use crate::reminders;
use crate::reset::{arm_midnight_reset, maybe_reset_for_new_day};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/service-worker.js", get(handlers::service_worker))
        .route("/api/state", get(handlers::get_state))
        .route("/api/log", post(handlers::log_water))
        .route("/api/settings", post(handlers::save_settings))
        .route("/api/reset", post(handlers::reset))
        .route("/api/reminders/enable", post(handlers::enable_reminders))
        .route("/api/notifications", get(handlers::notifications))
        .with_state(state)
}

/// Brings a freshly loaded state up to date: catches up on a missed day,
/// re-arms surviving reminders and starts the midnight timer.
pub async fn initialize(state: &AppState) -> Result<(), AppError> {
    let now = local_now();
    let today = day_key(now);
    let mut data = state.data.lock().await;
    if maybe_reset_for_new_day(&mut data, &today) {
        info!("new day {today}, progress reset");
    }
    reminders::resume(state, &mut data, now);
    state.persist(&data).await?;
    drop(data);

    arm_midnight_reset(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::AppData;
    use crate::timers::TimerKey;

    #[tokio::test]
    async fn initialize_resets_a_stale_day_and_arms_midnight() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let config = Config {
            data_path: std::env::temp_dir()
                .join(format!("hydration_app_{}_{nanos}.json", std::process::id())),
            ..Config::default()
        };
        let data = AppData {
            total_consumed: 1400,
            last_reset: Some("1999-12-31".to_string()),
            ..AppData::with_goal(2000)
        };
        let state = AppState::new(config, data);

        initialize(&state).await.unwrap();

        let data = state.data.lock().await;
        assert_eq!(data.total_consumed, 0);
        assert_eq!(data.last_reset, Some(day_key(local_now())));
        assert!(state.timers.is_pending(TimerKey::MidnightReset));
        let _ = std::fs::remove_file(state.data_path());
    }
}
