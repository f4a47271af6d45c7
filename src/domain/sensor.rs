// Sensor domain model - readings, devices, control commands and display helpers
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SensorReading {
    pub device_ip: Option<String>,
    pub device_id: Option<String>,
    pub timestamp: Option<String>,
    pub moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub light: Option<f64>,
    pub command_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceInfo>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_aggregated: bool,
}

impl SensorReading {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub id: String,
    pub ip: String,
    pub port: u16,
    #[serde(rename = "type")]
    pub device_type: String,
    pub registered_at: String,
    pub last_seen: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlCommand {
    pub device_ip: String,
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ControlCommand {
    /// Placeholder returned when nothing is queued for a device.
    pub fn idle(device_ip: &str) -> Self {
        Self {
            device_ip: device_ip.to_string(),
            command: None,
            payload: None,
            issued_at: None,
            status: Some("idle".to_string()),
        }
    }
}

/// History window selected on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timescale {
    #[default]
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl Timescale {
    pub fn code(&self) -> &'static str {
        match self {
            Timescale::Hour => "1h",
            Timescale::Day => "1d",
            Timescale::Month => "1m",
            Timescale::Year => "1y",
            Timescale::All => "all",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Timescale::Hour => "Last hour",
            Timescale::Day => "Last day",
            Timescale::Month => "Last month",
            Timescale::Year => "Last year",
            Timescale::All => "All data",
        }
    }

    /// Chart x-axis label for a timestamp; unparsable timestamps give "".
    pub fn chart_label(&self, timestamp: Option<DateTime<Utc>>) -> String {
        let Some(ts) = timestamp else {
            return String::new();
        };
        match self {
            Timescale::Hour => ts.format("%H:%M").to_string(),
            Timescale::Day => ts.format("%b %-d %H:%M").to_string(),
            _ => ts.format("%b %-d %y %H:%M").to_string(),
        }
    }
}

impl FromStr for Timescale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(Timescale::Hour),
            "1d" => Ok(Timescale::Day),
            "1m" => Ok(Timescale::Month),
            "1y" => Ok(Timescale::Year),
            "all" => Ok(Timescale::All),
            other => Err(format!("unknown timescale '{}'", other)),
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn code(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "C" | "c" => Some(TemperatureUnit::Celsius),
            "F" | "f" => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }

    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

/// Parses API timestamps, tolerating "+00:00Z" / "+00:00" suffixes and zone-less ISO.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let sanitized = if let Some(head) = trimmed.strip_suffix("+00:00Z") {
        format!("{}Z", head)
    } else if let Some(head) = trimmed.strip_suffix("+00:00") {
        format!("{}Z", head)
    } else {
        trimmed.to_string()
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&sanitized) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&sanitized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => "--".to_string(),
    }
}

pub fn format_timestamp(value: Option<&str>) -> String {
    match value {
        None => "--".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(ts) => ts.format("%b %-d, %H:%M").to_string(),
            None => raw.to_string(),
        },
    }
}

/// Formatted tile values for the latest reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDisplay {
    pub moisture: String,
    pub temperature: String,
    pub temperature_unit: String,
    pub humidity: String,
    pub ph: String,
    pub light: String,
    pub last_updated: String,
    pub command_status: String,
    pub device_status: String,
    pub device_type: String,
    pub device_last_seen: String,
}

impl SensorDisplay {
    pub fn from_reading(reading: &SensorReading, unit: TemperatureUnit) -> Self {
        let device = reading.device.as_ref();
        Self {
            moisture: format_value(reading.moisture, 1),
            temperature: format_value(reading.temperature.map(|t| unit.from_celsius(t)), 1),
            temperature_unit: unit.symbol().to_string(),
            humidity: format_value(reading.humidity, 1),
            ph: format_value(reading.ph, 2),
            light: format_value(reading.light, 0),
            last_updated: format_timestamp(reading.timestamp.as_deref()),
            command_status: reading
                .command_status
                .clone()
                .unwrap_or_else(|| "idle".to_string()),
            device_status: device
                .map(|d| d.status.clone())
                .unwrap_or_else(|| "online".to_string()),
            device_type: device
                .map(|d| d.device_type.clone())
                .unwrap_or_else(|| "soil_sensor".to_string()),
            device_last_seen: format_timestamp(device.map(|d| d.last_seen.as_str())),
        }
    }

    /// Every field blank, as shown while monitoring is paused.
    pub fn blank() -> Self {
        let dash = || "--".to_string();
        Self {
            moisture: dash(),
            temperature: dash(),
            temperature_unit: TemperatureUnit::default().symbol().to_string(),
            humidity: dash(),
            ph: dash(),
            light: dash(),
            last_updated: dash(),
            command_status: dash(),
            device_status: dash(),
            device_type: dash(),
            device_last_seen: dash(),
        }
    }
}
