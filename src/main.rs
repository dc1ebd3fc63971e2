use hydration_tracker::{AppState, Config, initialize, load_data, router};
use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&config.data_path, &config).await;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        mode = ?config.reminder_mode,
        unit = ?config.interval_unit,
        "loaded state from {}",
        config.data_path.display()
    );

    let state = AppState::new(config, data);
    initialize(&state).await?;

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
