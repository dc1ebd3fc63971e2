use crate::config::Config;
use crate::errors::AppError;
use crate::models::AppData;
use crate::notify::NotificationCenter;
use crate::storage::persist_data;
use crate::timers::TimerRegistry;
use std::{path::Path, sync::Arc};
use tokio::sync::Mutex;

/// Shared handles for every request and timer task. Lock `data` before
/// `notifications` when both are needed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub data: Arc<Mutex<AppData>>,
    pub timers: Arc<TimerRegistry>,
    pub notifications: Arc<Mutex<NotificationCenter>>,
}

impl AppState {
    /// The notification center starts from the permission stored with the
    /// record, so reminders resumed after a restart keep their display kind.
    pub fn new(config: Config, data: AppData) -> Self {
        let notifications = NotificationCenter::with_permission(data.notification_permission);
        Self {
            config: Arc::new(config),
            data: Arc::new(Mutex::new(data)),
            timers: Arc::new(TimerRegistry::new()),
            notifications: Arc::new(Mutex::new(notifications)),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data_path
    }

    pub async fn persist(&self, data: &AppData) -> Result<(), AppError> {
        persist_data(self.data_path(), data, &self.config).await
    }
}
