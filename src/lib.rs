pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod progress;
pub mod reminders;
pub mod reset;
pub mod scheduler;
pub mod settings;
pub mod shortcut;
pub mod state;
pub mod storage;
pub mod timers;
pub mod ui;

pub use app::{initialize, router};
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
