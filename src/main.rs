// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use std::{sync::Arc, time::Duration};

use crate::application::dashboard_session::{DashboardSession, SessionOptions};
use crate::application::sensor_service::SensorService;
use crate::application::settings_store::SettingsStore;
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::chart_snapshot::ChartSnapshot;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::mock_sensor_repository::MockSensorRepository;
use crate::infrastructure::settings::{JsonFileSettings, MemorySettings};
use crate::infrastructure::svg_surface::SvgSurface;
use crate::presentation::app_state::AppState;
use crate::presentation::refresh::{refresh_once, spawn_auto_refresh};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create adapters (infrastructure layer)
    let settings: Arc<dyn SettingsStore> = match &config.dashboard.settings_path {
        Some(path) => Arc::new(JsonFileSettings::open(path)),
        None => Arc::new(MemorySettings::new()),
    };
    let activity = Arc::new(ActivityLog::new());
    let repository = Arc::new(MockSensorRepository::new());
    let surface = SvgSurface::new(
        config.map.width,
        config.map.height,
        config.map.pixel_density(),
    );
    let (map_width, map_height) = config.map.device_size();
    tracing::info!("Robot map surface {}x{} device pixels", map_width, map_height);

    // Create services (application layer)
    let sensor_service = SensorService::new(repository);
    let options = SessionOptions {
        default_trail_limit: config.dashboard.default_trail_limit,
        move_step: config.dashboard.move_step,
        rotate_step: config.dashboard.rotate_step,
        metrics: config.dashboard.series.clone(),
        default_unit: config.dashboard.temperature_unit,
        timescale: config.dashboard.timescale,
    };
    let session = DashboardSession::new(
        options,
        settings,
        activity.clone(),
        Some(surface),
        Some(ChartSnapshot::default()),
    );

    // Create application state
    let state = Arc::new(AppState {
        sensor_service,
        session: Arc::new(Mutex::new(session)),
        activity,
        device_ip: config.dashboard.device_ip.clone(),
        history_limit: config.sensor.history_limit,
    });

    refresh_once(&state, None).await;
    let every = Duration::from_secs(config.dashboard.refresh_interval_secs.max(1));
    spawn_auto_refresh(state.clone(), every);

    // Build router (presentation layer)
    let router = presentation::router(state);

    // Start server
    let addr = config.server.bind_address();
    tracing::info!("Starting soil-monitor dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(&addr).await?, router).await?;

    Ok(())
}
