// Chart series domain model - plottable metrics and their visibility ordering
use crate::domain::sensor::{SensorReading, TemperatureUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which vertical edge of the chart an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Left,
    Right,
}

impl AxisSide {
    /// Alternates right, left, right... by position.
    pub fn alternating(position: usize) -> Self {
        if position % 2 == 0 {
            AxisSide::Right
        } else {
            AxisSide::Left
        }
    }
}

/// Sensor quantity a series plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Humidity,
    Temperature,
    Moisture,
    Ph,
    Light,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Humidity => "humidity",
            Metric::Temperature => "temperature",
            Metric::Moisture => "moisture",
            Metric::Ph => "pH",
            Metric::Light => "light",
        }
    }

    /// Settings key holding the persisted visibility flag.
    pub fn visibility_key(&self) -> &'static str {
        match self {
            Metric::Humidity => "showHumidity",
            Metric::Temperature => "showTemperature",
            Metric::Moisture => "showMoisture",
            Metric::Ph => "showPh",
            Metric::Light => "showLight",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Metric::Humidity => "#3b82f6",
            Metric::Temperature => "#f87171",
            Metric::Moisture => "#34d399",
            Metric::Ph => "#a78bfa",
            Metric::Light => "#fbbf24",
        }
    }

    pub fn fill_color(&self) -> Option<&'static str> {
        match self {
            Metric::Humidity => Some("rgba(59, 130, 246, 0.1)"),
            _ => None,
        }
    }

    pub fn label(&self, unit: TemperatureUnit) -> String {
        match self {
            Metric::Humidity => "Humidity (%)".to_string(),
            Metric::Temperature => format!("Temp ({})", unit.symbol()),
            Metric::Moisture => "Moisture (%)".to_string(),
            Metric::Ph => "pH".to_string(),
            Metric::Light => "Light (lx)".to_string(),
        }
    }

    pub fn axis_title(&self, unit: TemperatureUnit) -> String {
        match self {
            Metric::Humidity => "Humidity %".to_string(),
            Metric::Temperature => format!("Temp ({})", unit.symbol()),
            Metric::Moisture => "Moisture %".to_string(),
            Metric::Ph => "pH".to_string(),
            Metric::Light => "Light".to_string(),
        }
    }

    /// Reads this metric out of a reading, converting temperature into `unit`.
    pub fn value_of(&self, reading: &SensorReading, unit: TemperatureUnit) -> Option<f64> {
        match self {
            Metric::Humidity => reading.humidity,
            Metric::Temperature => reading.temperature.map(|t| unit.from_celsius(t)),
            Metric::Moisture => reading.moisture,
            Metric::Ph => reading.ph,
            Metric::Light => reading.light,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

/// One plottable data source. Created once, only visibility, side and values change.
#[derive(Debug, Clone)]
pub struct Series {
    pub metric: Metric,
    pub label: String,
    pub hidden: bool,
    pub assigned_side: Option<AxisSide>,
    pub axis_id: String,
    pub axis_color: String,
    pub axis_title: String,
    pub values: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(index: usize, metric: Metric, unit: TemperatureUnit) -> Self {
        Self {
            metric,
            label: metric.label(unit),
            hidden: false,
            assigned_side: None,
            axis_id: axis_id(index),
            axis_color: metric.color().to_string(),
            axis_title: metric.axis_title(unit),
            values: Vec::new(),
        }
    }

    pub fn relabel(&mut self, unit: TemperatureUnit) {
        self.label = self.metric.label(unit);
        self.axis_title = self.metric.axis_title(unit);
    }
}

/// Axis identifier tied to the series' fixed slot: "y", "y1", "y2"...
pub fn axis_id(index: usize) -> String {
    if index == 0 {
        "y".to_string()
    } else {
        format!("y{}", index)
    }
}

/// Series indices in the order they were last made visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityOrder {
    indices: Vec<usize>,
}

impl VisibilityOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds from per-series flags in array order.
    pub fn from_flags(flags: &[bool]) -> Self {
        let indices = flags
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(i, _)| i)
            .collect();
        Self { indices }
    }

    /// Appends unless already present; existing members never move.
    pub fn show(&mut self, index: usize) {
        if !self.indices.contains(&index) {
            self.indices.push(index);
        }
    }

    pub fn hide(&mut self, index: usize) {
        self.indices.retain(|i| *i != index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_id() {
        assert_eq!(axis_id(0), "y");
        assert_eq!(axis_id(1), "y1");
        assert_eq!(axis_id(4), "y4");
    }

    #[test]
    fn test_visibility_order_appends_without_reordering() {
        let mut order = VisibilityOrder::from_flags(&[true, false, true]);
        assert_eq!(order.as_slice(), &[0, 2]);

        order.show(1);
        order.show(0);
        assert_eq!(order.as_slice(), &[0, 2, 1]);

        order.hide(0);
        order.show(0);
        assert_eq!(order.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_temperature_label_follows_unit() {
        let mut series = Series::new(1, Metric::Temperature, TemperatureUnit::Celsius);
        assert_eq!(series.label, "Temp (°C)");
        series.relabel(TemperatureUnit::Fahrenheit);
        assert_eq!(series.label, "Temp (°F)");
        assert_eq!(series.axis_title, "Temp (°F)");
    }
}
