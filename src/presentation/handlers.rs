// HTTP request handlers - stub sensor, device and control endpoints
use crate::application::sensor_service::DeviceRegistration;
use crate::domain::sensor::{ControlCommand, DeviceInfo, SensorReading, Timescale};
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorQuery {
    pub device_ip: Option<String>,
    pub history: Option<String>,
    pub timescale: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    pub device_ip: Option<String>,
    pub command: Option<String>,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlQuery {
    pub device_ip: Option<String>,
    pub consume: Option<String>,
}

/// Query flags accept `true`, `1` and `yes` in any case.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}

pub fn parse_timescale(value: Option<&str>, default: Timescale) -> Result<Timescale, ApiError> {
    match value.filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Unknown timescale '{}'", raw))),
        None => Ok(default),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn register_device(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<DeviceRegistration>,
) -> Result<Json<DeviceInfo>, ApiError> {
    let device = state.sensor_service.register_device(registration).await?;
    tracing::info!("Device {} registered at {}:{}", device.id, device.ip, device.port);
    Ok(Json(device))
}

/// Latest reading, or `{count, history, timescale}` when `history` is set.
pub async fn get_sensor_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SensorQuery>,
) -> Result<Response, ApiError> {
    let device_ip = query.device_ip.as_deref().filter(|ip| !ip.is_empty());

    if parse_flag(query.history.as_deref(), false) {
        let timescale = parse_timescale(query.timescale.as_deref(), Timescale::Hour)?;
        let limit = query.limit.unwrap_or(state.history_limit);
        let history = state
            .sensor_service
            .history(device_ip, timescale, limit)
            .await?;
        return Ok(Json(json!({
            "count": history.len(),
            "history": history,
            "timescale": timescale,
        }))
        .into_response());
    }

    match state.sensor_service.latest(device_ip).await? {
        Some(reading) => Ok(Json(reading).into_response()),
        None => Err(ApiError::NotFound(match device_ip {
            Some(ip) => format!("No data available for IP {}", ip),
            None => "No data available".to_string(),
        })),
    }
}

pub async fn post_sensor_data(
    State(state): State<Arc<AppState>>,
    Json(reading): Json<SensorReading>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state.sensor_service.record(reading).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Sensor data recorded", "data": stored })),
    ))
}

pub async fn queue_control_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ControlRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .sensor_service
        .queue_command(request.device_ip, request.command, request.payload)
        .await?;
    Ok(Json(json!({ "message": "Command queued", "command": entry })))
}

/// Pending command for a device; consumed unless `consume=false`.
pub async fn get_control_command(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ControlQuery>,
) -> Result<Json<ControlCommand>, ApiError> {
    let consume = parse_flag(query.consume.as_deref(), true);
    let command = state
        .sensor_service
        .take_command(query.device_ip.as_deref(), consume)
        .await?;
    Ok(Json(command))
}
