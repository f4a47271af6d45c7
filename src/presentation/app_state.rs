// Application state for HTTP handlers
use crate::application::dashboard_session::DashboardSession;
use crate::application::sensor_service::SensorService;
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::chart_snapshot::ChartSnapshot;
use crate::infrastructure::svg_surface::SvgSurface;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The dashboard as served over HTTP: SVG map plus a polled chart snapshot.
pub type LiveSession = DashboardSession<SvgSurface, ChartSnapshot>;

#[derive(Clone)]
pub struct AppState {
    pub sensor_service: SensorService,
    pub session: Arc<Mutex<LiveSession>>,
    pub activity: Arc<ActivityLog>,
    /// Device polled by the dashboard; any device when unset.
    pub device_ip: Option<String>,
    pub history_limit: usize,
}
