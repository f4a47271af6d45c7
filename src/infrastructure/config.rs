use crate::domain::sensor::{TemperatureUnit, Timescale};
use crate::domain::series::Metric;
use serde::Deserialize;
use std::path::PathBuf;

const MIN_MAP_WIDTH: f64 = 200.0;
const MIN_MAP_HEIGHT: f64 = 120.0;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
    pub map: MapSettings,
    pub sensor: SensorSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub refresh_interval_secs: u64,
    pub default_trail_limit: usize,
    pub move_step: f64,
    pub rotate_step: f64,
    /// No path keeps settings in memory for the life of the process.
    pub settings_path: Option<PathBuf>,
    /// Only poll this device; all devices when unset.
    pub device_ip: Option<String>,
    pub series: Vec<Metric>,
    pub timescale: Timescale,
    pub temperature_unit: TemperatureUnit,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            default_trail_limit: crate::domain::robot::DEFAULT_TRAIL_LIMIT,
            move_step: 1.0,
            rotate_step: 15.0,
            settings_path: None,
            device_ip: None,
            series: vec![Metric::Humidity, Metric::Temperature],
            timescale: Timescale::Hour,
            temperature_unit: TemperatureUnit::Celsius,
        }
    }
}

/// Robot map size in CSS pixels.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapSettings {
    pub width: f64,
    pub height: f64,
    pub pixel_density: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 240.0,
            pixel_density: 1.0,
        }
    }
}

impl MapSettings {
    /// Device-pixel size, never smaller than 200x120 CSS pixels.
    pub fn device_size(&self) -> (f64, f64) {
        let dpr = self.pixel_density();
        (
            self.width.max(MIN_MAP_WIDTH) * dpr,
            self.height.max(MIN_MAP_HEIGHT) * dpr,
        )
    }

    pub fn pixel_density(&self) -> f64 {
        if self.pixel_density.is_finite() && self.pixel_density > 0.0 {
            self.pixel_density
        } else {
            1.0
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorSettings {
    pub history_limit: usize,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

/// Defaults, then `config/soil-monitor.*` if present, then `SOIL_MONITOR__*` env vars.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/soil-monitor").required(false))
        .add_source(
            config::Environment::with_prefix("SOIL_MONITOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
