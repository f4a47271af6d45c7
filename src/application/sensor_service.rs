// Sensor service - Use cases behind the stub sensor/device/control endpoints
use crate::application::sensor_repository::SensorRepository;
use crate::domain::sensor::{ControlCommand, DeviceInfo, SensorReading, Timescale};
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const TARGET_POINTS: usize = 60;
const MAX_AGGREGATED_POINTS: usize = TARGET_POINTS + 5;

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Port must be a number")]
    InvalidPort,
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    pub id: Option<String>,
    pub ip: Option<String>,
    pub device_ip: Option<String>,
    pub port: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
}

#[derive(Clone)]
pub struct SensorService {
    repository: Arc<dyn SensorRepository>,
    // transient, never persisted
    commands: Arc<Mutex<HashMap<String, ControlCommand>>>,
}

impl SensorService {
    pub fn new(repository: Arc<dyn SensorRepository>) -> Self {
        Self {
            repository,
            commands: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn latest(&self, device_ip: Option<&str>) -> Result<Option<SensorReading>, SensorError> {
        Ok(self.repository.latest_reading(device_ip).await?)
    }

    /// Chronological history, bucket-averaged down to about 60 points for long windows.
    pub async fn history(
        &self,
        device_ip: Option<&str>,
        timescale: Timescale,
        limit: usize,
    ) -> Result<Vec<SensorReading>, SensorError> {
        let mut raw = self.repository.readings(device_ip, timescale).await?;
        raw.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        tracing::debug!("Loaded {} raw readings for {}", raw.len(), timescale);
        Ok(aggregate_history(raw, timescale, limit))
    }

    pub async fn record(&self, mut reading: SensorReading) -> Result<SensorReading, SensorError> {
        if reading.device_ip.as_deref().is_none_or(str::is_empty) {
            return Err(SensorError::MissingField("Device IP"));
        }
        // server time keeps the chart ordering reliable
        reading.timestamp = Some(now_iso());
        let stored = self.repository.store_reading(reading).await?;
        tracing::info!(
            "Sensor data recorded for {}",
            stored.device_ip.as_deref().unwrap_or("unknown")
        );
        Ok(stored)
    }

    pub async fn register_device(
        &self,
        registration: DeviceRegistration,
    ) -> Result<DeviceInfo, SensorError> {
        let ip = registration
            .ip
            .or(registration.device_ip)
            .filter(|ip| !ip.is_empty())
            .ok_or(SensorError::MissingField("ip and port"))?;
        let port = match registration.port {
            None | Some(serde_json::Value::Null) => {
                return Err(SensorError::MissingField("ip and port"));
            }
            Some(value) => parse_port(&value)?,
        };

        let now = now_iso();
        let device = DeviceInfo {
            id: registration.id.unwrap_or_else(generate_device_id),
            ip,
            port,
            device_type: registration
                .device_type
                .unwrap_or_else(|| "soil_sensor".to_string()),
            registered_at: now.clone(),
            last_seen: now,
            status: "active".to_string(),
        };
        Ok(self.repository.upsert_device(device).await?)
    }

    pub async fn queue_command(
        &self,
        device_ip: Option<String>,
        command: Option<String>,
        payload: Option<serde_json::Value>,
    ) -> Result<ControlCommand, SensorError> {
        let (Some(device_ip), Some(command)) = (
            device_ip.filter(|ip| !ip.is_empty()),
            command.filter(|c| !c.is_empty()),
        ) else {
            return Err(SensorError::MissingField("deviceIp and command"));
        };

        let entry = ControlCommand {
            device_ip: device_ip.clone(),
            command: Some(command),
            payload,
            issued_at: Some(now_iso()),
            status: None,
        };
        self.commands.lock().await.insert(device_ip, entry.clone());
        Ok(entry)
    }

    /// Queued command for a device, removed when `consume`; otherwise an idle placeholder.
    pub async fn take_command(
        &self,
        device_ip: Option<&str>,
        consume: bool,
    ) -> Result<ControlCommand, SensorError> {
        let device_ip = device_ip
            .filter(|ip| !ip.is_empty())
            .ok_or(SensorError::MissingField("Device IP"))?;

        let mut commands = self.commands.lock().await;
        let entry = if consume {
            commands.remove(device_ip)
        } else {
            commands.get(device_ip).cloned()
        };
        Ok(entry.unwrap_or_else(|| ControlCommand::idle(device_ip)))
    }
}

fn parse_port(value: &serde_json::Value) -> Result<u16, SensorError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|p| u16::try_from(p).ok())
        .ok_or(SensorError::InvalidPort)
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn generate_device_id() -> String {
    let suffix: u64 = rand::thread_rng().r#gen();
    format!("dev_{:016x}", suffix)
}

/// Keeps short histories as-is and averages long ones into ~60 buckets.
pub fn aggregate_history(
    raw: Vec<SensorReading>,
    timescale: Timescale,
    limit: usize,
) -> Vec<SensorReading> {
    if raw.len() <= TARGET_POINTS || timescale == Timescale::Hour {
        if timescale == Timescale::All && raw.len() > limit {
            let skip = raw.len() - limit;
            return raw.into_iter().skip(skip).collect();
        }
        return raw;
    }

    let chunk_size = raw.len() / TARGET_POINTS;
    raw.chunks(chunk_size)
        .map(average_chunk)
        .take(MAX_AGGREGATED_POINTS)
        .collect()
}

fn average_chunk(chunk: &[SensorReading]) -> SensorReading {
    let avg = |field: fn(&SensorReading) -> Option<f64>| {
        let values: Vec<f64> = chunk
            .iter()
            .filter_map(field)
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            None
        } else {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        }
    };

    SensorReading {
        timestamp: chunk.last().and_then(|r| r.timestamp.clone()),
        moisture: avg(|r| r.moisture),
        temperature: avg(|r| r.temperature),
        humidity: avg(|r| r.humidity),
        ph: avg(|r| r.ph),
        light: avg(|r| r.light),
        device_ip: chunk.first().and_then(|r| r.device_ip.clone()),
        is_aggregated: true,
        ..Default::default()
    }
}
