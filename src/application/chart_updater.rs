// Chart updater - pushes axis bindings and series data into the chart renderer
use crate::application::axis_allocator::{AxisAllocator, AxisConfig};
use crate::domain::sensor::{SensorReading, TemperatureUnit, Timescale};
use crate::domain::series::{Metric, Series, SeriesPoint};
use serde::Serialize;

const LINE_TENSION: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    pub border_color: String,
    pub background_color: Option<String>,
    pub tension: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesBinding {
    pub id: String,
    pub label: String,
    pub axis_id: String,
    pub hidden: bool,
    pub points: Vec<ChartPoint>,
    pub style: SeriesStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartConfig {
    pub series: Vec<SeriesBinding>,
    pub axes: Vec<AxisConfig>,
}

/// Declarative series/axis renderer.
pub trait ChartRenderer {
    fn configure(&mut self, config: ChartConfig);
    fn redraw(&mut self, animate: bool);
}

pub struct ChartUpdater<R: ChartRenderer> {
    allocator: AxisAllocator,
    renderer: Option<R>,
    unit: TemperatureUnit,
    timescale: Timescale,
    history: Option<Vec<SensorReading>>,
}

impl<R: ChartRenderer> ChartUpdater<R> {
    pub fn new(metrics: &[Metric], unit: TemperatureUnit, renderer: Option<R>) -> Self {
        let series = metrics
            .iter()
            .enumerate()
            .map(|(i, metric)| Series::new(i, *metric, unit))
            .collect();

        Self {
            allocator: AxisAllocator::new(series),
            renderer,
            unit,
            timescale: Timescale::default(),
            history: None,
        }
    }

    /// Seeds visibility from persisted flags and pushes the initial layout.
    pub fn restore_visibility(&mut self, flags: &[bool]) {
        self.allocator.seed(flags);
        self.push();
    }

    /// Returns false when the chart is unavailable or the series doesn't exist.
    pub fn set_visibility(&mut self, index: usize, visible: bool) -> bool {
        if self.renderer.is_none() {
            tracing::warn!("Chart renderer unavailable, ignoring visibility change");
            return false;
        }
        if !self.allocator.set_visible(index, visible) {
            tracing::debug!("No chart series at index {}", index);
            return false;
        }
        self.push();
        true
    }

    /// Replaces every series' values from `history`, oldest first.
    pub fn update_history(&mut self, history: Vec<SensorReading>, timescale: Timescale) {
        if self.renderer.is_none() {
            tracing::warn!("Chart renderer unavailable, dropping {} readings", history.len());
            return;
        }

        let mut sorted = history;
        sorted.sort_by_key(|reading| reading.parsed_timestamp());
        self.timescale = timescale;
        self.fill_series(&sorted);
        self.history = Some(sorted);
        self.push();
    }

    /// Relabels temperature series and replots the last history in the new unit.
    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
        for series in self.allocator.series_mut() {
            series.relabel(unit);
        }
        if let Some(history) = self.history.take() {
            self.fill_series(&history);
            self.history = Some(history);
        }
        if self.renderer.is_some() {
            self.push();
        }
    }

    pub fn series(&self) -> &[Series] {
        self.allocator.series()
    }

    pub fn visibility_order(&self) -> &[usize] {
        self.allocator.order().as_slice()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    #[cfg(test)]
    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    fn fill_series(&mut self, sorted: &[SensorReading]) {
        let unit = self.unit;
        for series in self.allocator.series_mut() {
            series.values = sorted
                .iter()
                .map(|reading| SeriesPoint {
                    timestamp: reading.parsed_timestamp(),
                    value: series.metric.value_of(reading, unit),
                })
                .collect();
        }
    }

    fn push(&mut self) {
        self.allocator.rebalance();
        let axes = self.allocator.normalize_axes();
        let config = self.build_config(&self.allocator, axes);

        let Some(renderer) = self.renderer.as_mut() else {
            tracing::warn!("Chart renderer unavailable, skipping redraw");
            return;
        };
        renderer.configure(config);
        // refreshes are frequent, animating them is noise
        renderer.redraw(false);
    }

    fn build_config(&self, allocator: &AxisAllocator, axes: Vec<AxisConfig>) -> ChartConfig {
        let series = allocator
            .series()
            .iter()
            .map(|s| SeriesBinding {
                id: s.metric.name().to_string(),
                label: s.label.clone(),
                axis_id: s.axis_id.clone(),
                hidden: s.hidden,
                points: s
                    .values
                    .iter()
                    .map(|p| ChartPoint {
                        label: self.timescale.chart_label(p.timestamp),
                        value: p.value,
                    })
                    .collect(),
                style: SeriesStyle {
                    border_color: s.metric.color().to_string(),
                    background_color: s.metric.fill_color().map(str::to_string),
                    tension: LINE_TENSION,
                },
            })
            .collect();

        ChartConfig { series, axes }
    }
}
