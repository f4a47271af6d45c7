// Presentation layer - axum routes over the dashboard session and sensor service
pub mod app_state;
pub mod dashboard_handlers;
pub mod handlers;
pub mod refresh;

use crate::presentation::app_state::AppState;
use crate::presentation::dashboard_handlers::{
    clear_activity, get_activity, get_chart, get_map_svg, get_readings, get_robot,
    post_chart_refresh, post_override, post_reset, put_override_enabled, put_series_visibility,
    put_temperature_unit, put_trail_limit,
};
use crate::presentation::handlers::{
    get_control_command, get_sensor_data, health_check, post_sensor_data, queue_control_command,
    register_device,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/devices", post(register_device))
        .route("/api/sensor-data", get(get_sensor_data).post(post_sensor_data))
        .route("/api/control", get(get_control_command).post(queue_control_command))
        .route("/robot", get(get_robot))
        .route("/robot/override", post(post_override))
        .route("/robot/override/enabled", put(put_override_enabled))
        .route("/robot/reset", post(post_reset))
        .route("/robot/trail-limit", put(put_trail_limit))
        .route("/robot/map.svg", get(get_map_svg))
        .route("/chart", get(get_chart))
        .route("/chart/series/:index", put(put_series_visibility))
        .route("/chart/temperature-unit", put(put_temperature_unit))
        .route("/chart/refresh", post(post_chart_refresh))
        .route("/dashboard/readings", get(get_readings))
        .route("/activity", get(get_activity).delete(clear_activity))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
