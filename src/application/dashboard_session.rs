// Dashboard session - Owns the Core state and wires it to its collaborators
use crate::application::activity_sink::{ActivitySink, Severity};
use crate::application::chart_updater::{ChartRenderer, ChartUpdater};
use crate::application::map_renderer::DrawingSurface;
use crate::application::position_engine::{DeadReckoningEngine, PositionEngine};
use crate::application::settings_store::{SettingsStore, TEMP_UNIT_KEY};
use crate::domain::sensor::{SensorDisplay, SensorReading, TemperatureUnit, Timescale};
use crate::domain::series::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Manual override arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Arrow keys and WASD.
    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(arrow) = key.strip_prefix("Arrow") {
            return arrow.to_lowercase().parse().ok();
        }
        match key.to_lowercase().as_str() {
            "w" => Some(Direction::Up),
            "a" => Some(Direction::Left),
            "s" => Some(Direction::Down),
            "d" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub default_trail_limit: usize,
    pub move_step: f64,
    pub rotate_step: f64,
    pub metrics: Vec<Metric>,
    pub default_unit: TemperatureUnit,
    pub timescale: Timescale,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_trail_limit: crate::domain::robot::DEFAULT_TRAIL_LIMIT,
            move_step: 1.0,
            rotate_step: 15.0,
            metrics: vec![Metric::Humidity, Metric::Temperature],
            default_unit: TemperatureUnit::Celsius,
            timescale: Timescale::Hour,
        }
    }
}

/// Everything one dashboard needs, passed by handle instead of living in globals.
pub struct DashboardSession<S: DrawingSurface, R: ChartRenderer> {
    engine: DeadReckoningEngine<S>,
    chart: ChartUpdater<R>,
    settings: Arc<dyn SettingsStore>,
    activity: Arc<dyn ActivitySink>,
    options: SessionOptions,
    override_enabled: bool,
    last_override: Option<Direction>,
    latest: Option<SensorReading>,
    timescale: Timescale,
}

impl<S: DrawingSurface, R: ChartRenderer> DashboardSession<S, R> {
    /// Builds the session and restores trail limit, unit and series visibility.
    pub fn new(
        options: SessionOptions,
        settings: Arc<dyn SettingsStore>,
        activity: Arc<dyn ActivitySink>,
        surface: Option<S>,
        renderer: Option<R>,
    ) -> Self {
        let unit = settings
            .get(TEMP_UNIT_KEY)
            .and_then(|code| TemperatureUnit::from_code(&code))
            .unwrap_or(options.default_unit);

        let mut engine = DeadReckoningEngine::new(
            settings.clone(),
            activity.clone(),
            options.default_trail_limit,
        );
        if let Some(surface) = surface {
            engine.attach_surface(surface);
        }

        let mut chart = ChartUpdater::new(&options.metrics, unit, renderer);
        let flags: Vec<bool> = options
            .metrics
            .iter()
            .map(|m| settings.get(m.visibility_key()).as_deref() != Some("false"))
            .collect();
        chart.restore_visibility(&flags);

        activity.log("Dashboard ready");
        let timescale = options.timescale;

        Self {
            engine,
            chart,
            settings,
            activity,
            options,
            override_enabled: false,
            last_override: None,
            latest: None,
            timescale,
        }
    }

    pub fn set_override_enabled(&mut self, enabled: bool) {
        self.override_enabled = enabled;
        self.activity.log(if enabled {
            "Manual override enabled"
        } else {
            "Manual override disabled"
        });
    }

    pub fn override_enabled(&self) -> bool {
        self.override_enabled
    }

    pub fn last_override(&self) -> Option<Direction> {
        self.last_override
    }

    /// Drives the robot one step. Refused unless override is enabled.
    pub fn send_override(&mut self, direction: Direction) -> bool {
        if !self.override_enabled {
            self.activity.alert("Enable override first", Severity::Error);
            return false;
        }

        match direction {
            Direction::Up => self.engine.move_by(self.options.move_step),
            Direction::Down => self.engine.move_by(-self.options.move_step),
            Direction::Left => self.engine.rotate(-self.options.rotate_step),
            Direction::Right => self.engine.rotate(self.options.rotate_step),
        }

        self.last_override = Some(direction);
        self.activity.log(&format!("Override command: {}", direction));
        self.activity
            .alert(&format!("Override: {}", direction), Severity::Success);
        true
    }

    /// Shows/hides a chart series and persists the flag.
    pub fn toggle_series(&mut self, index: usize, visible: bool) -> bool {
        if !self.chart.set_visibility(index, visible) {
            return false;
        }
        if let Some(series) = self.chart.series().get(index) {
            let metric = series.metric;
            self.settings
                .set(metric.visibility_key(), if visible { "true" } else { "false" });
            self.activity.log(&format!(
                "{} {} on chart",
                if visible { "Showing" } else { "Hiding" },
                metric.name()
            ));
        }
        true
    }

    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.chart.set_temperature_unit(unit);
        self.settings.set(TEMP_UNIT_KEY, unit.code());
        self.activity
            .log(&format!("Units changed to {}", unit.symbol()));
    }

    /// Window used by the next refresh.
    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    pub fn select_timescale(&mut self, timescale: Timescale) {
        self.timescale = timescale;
    }

    pub fn apply_latest(&mut self, reading: SensorReading) {
        self.latest = Some(reading);
    }

    pub fn apply_history(&mut self, history: Vec<SensorReading>, timescale: Timescale) {
        self.chart.update_history(history, timescale);
        self.activity
            .log(&format!("Synced data for {}", timescale.display_name()));
    }

    pub fn display(&self) -> SensorDisplay {
        match &self.latest {
            Some(reading) => SensorDisplay::from_reading(reading, self.chart.unit()),
            None => SensorDisplay::blank(),
        }
    }

    pub fn engine(&self) -> &DeadReckoningEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DeadReckoningEngine<S> {
        &mut self.engine
    }

    pub fn chart(&self) -> &ChartUpdater<R> {
        &self.chart
    }
}
