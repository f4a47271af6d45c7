// Axis allocator - keeps each visible series on a stable left/right axis
use crate::domain::series::{axis_id, AxisSide, Series, VisibilityOrder};
use serde::Serialize;

const FALLBACK_AXIS_COLOR: &str = "#94a3b8";

/// Per-series vertical axis handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    pub id: String,
    pub side: AxisSide,
    pub visible: bool,
    /// Only one axis paints grid lines across the plot area.
    pub draws_grid: bool,
    pub color: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct AxisAllocator {
    series: Vec<Series>,
    order: VisibilityOrder,
}

impl AxisAllocator {
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            series,
            order: VisibilityOrder::new(),
        }
    }

    /// Replaces visibility wholesale from per-series flags, in array order.
    pub fn seed(&mut self, flags: &[bool]) {
        self.order = VisibilityOrder::from_flags(flags);
        for (i, series) in self.series.iter_mut().enumerate() {
            series.hidden = !self.order.contains(i);
            if series.hidden {
                series.assigned_side = None;
            }
        }
    }

    /// Shows or hides one series. Unknown indices are ignored and return false.
    pub fn set_visible(&mut self, index: usize, visible: bool) -> bool {
        let Some(series) = self.series.get_mut(index) else {
            return false;
        };

        if visible {
            self.order.show(index);
            series.hidden = false;
        } else {
            self.order.hide(index);
            series.hidden = true;
            series.assigned_side = None;
        }
        true
    }

    /// Assigns sides by position in the visibility order: right, left, right...
    /// Without any recorded order, alternates over visible series in array order.
    pub fn rebalance(&mut self) {
        if self.series.is_empty() {
            return;
        }

        if !self.order.is_empty() {
            for (position, index) in self.order.as_slice().iter().enumerate() {
                if let Some(series) = self.series.get_mut(*index) {
                    series.assigned_side = Some(AxisSide::alternating(position));
                }
            }
            return;
        }

        for (position, series) in self.series.iter_mut().filter(|s| !s.hidden).enumerate() {
            series.assigned_side = Some(AxisSide::alternating(position));
        }
    }

    /// Derives one axis per series in array order. The axis id follows the fixed
    /// slot while the side follows the visibility order.
    pub fn normalize_axes(&mut self) -> Vec<AxisConfig> {
        let mut grid_taken = false;

        self.series
            .iter_mut()
            .enumerate()
            .map(|(i, series)| {
                let id = axis_id(i);
                series.axis_id = id.clone();

                let draws_grid = !grid_taken && !series.hidden;
                grid_taken |= draws_grid;

                let color = if series.axis_color.is_empty() {
                    FALLBACK_AXIS_COLOR.to_string()
                } else {
                    series.axis_color.clone()
                };
                let title = if series.axis_title.is_empty() {
                    series.label.clone()
                } else {
                    series.axis_title.clone()
                };

                AxisConfig {
                    id,
                    side: series
                        .assigned_side
                        .unwrap_or_else(|| AxisSide::alternating(i)),
                    visible: !series.hidden,
                    draws_grid,
                    color,
                    title,
                }
            })
            .collect()
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut [Series] {
        &mut self.series
    }

    pub fn order(&self) -> &VisibilityOrder {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::TemperatureUnit;
    use crate::domain::series::Metric;

    fn allocator(metrics: &[Metric]) -> AxisAllocator {
        let series = metrics
            .iter()
            .enumerate()
            .map(|(i, m)| Series::new(i, *m, TemperatureUnit::Celsius))
            .collect();
        AxisAllocator::new(series)
    }

    fn sides(allocator: &AxisAllocator) -> Vec<Option<AxisSide>> {
        allocator.series().iter().map(|s| s.assigned_side).collect()
    }

    #[test]
    fn test_sides_follow_visibility_order() {
        let mut alloc = allocator(&[Metric::Humidity, Metric::Temperature, Metric::Moisture]);
        alloc.seed(&[false, false, false]);

        alloc.set_visible(2, true);
        alloc.set_visible(0, true);
        alloc.rebalance();
        assert_eq!(
            sides(&alloc),
            vec![Some(AxisSide::Left), None, Some(AxisSide::Right)]
        );
    }

    #[test]
    fn test_toggle_off_on_appends_to_end() {
        let mut alloc = allocator(&[Metric::Humidity, Metric::Temperature, Metric::Moisture]);
        alloc.seed(&[true, true, true]);
        alloc.rebalance();
        assert_eq!(alloc.order().as_slice(), &[0, 1, 2]);

        alloc.set_visible(2, false);
        assert_eq!(alloc.series()[2].assigned_side, None);
        alloc.set_visible(2, true);
        alloc.rebalance();

        // last member cycled: nothing moved, sides unchanged
        assert_eq!(alloc.order().as_slice(), &[0, 1, 2]);
        assert_eq!(
            sides(&alloc),
            vec![Some(AxisSide::Right), Some(AxisSide::Left), Some(AxisSide::Right)]
        );

        alloc.set_visible(0, false);
        alloc.set_visible(0, true);
        alloc.rebalance();
        // untouched members keep their relative order
        assert_eq!(alloc.order().as_slice(), &[1, 2, 0]);
    }

    #[test]
    fn test_set_visible_is_idempotent() {
        let mut alloc = allocator(&[Metric::Humidity, Metric::Temperature]);
        alloc.seed(&[true, true]);
        alloc.set_visible(0, true);
        assert_eq!(alloc.order().as_slice(), &[0, 1]);
    }

    #[test]
    fn test_unknown_series_is_ignored() {
        let mut alloc = allocator(&[Metric::Humidity]);
        assert!(!alloc.set_visible(5, true));
        assert!(alloc.order().is_empty());

        let mut empty = AxisAllocator::new(Vec::new());
        empty.rebalance();
        assert!(empty.normalize_axes().is_empty());
    }

    #[test]
    fn test_fallback_alternates_over_visible_series() {
        let mut alloc = allocator(&[Metric::Humidity, Metric::Temperature, Metric::Moisture]);
        alloc.series_mut()[1].hidden = true;
        alloc.rebalance();
        assert_eq!(
            sides(&alloc),
            vec![Some(AxisSide::Right), None, Some(AxisSide::Left)]
        );
    }

    #[test]
    fn test_normalize_axes_single_grid_and_hidden_axes() {
        let mut alloc = allocator(&[Metric::Humidity, Metric::Temperature, Metric::Moisture]);
        alloc.seed(&[false, true, true]);
        alloc.rebalance();
        let axes = alloc.normalize_axes();

        let ids: Vec<&str> = axes.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "y1", "y2"]);
        assert_eq!(axes.iter().filter(|a| a.draws_grid).count(), 1);
        assert!(axes[1].draws_grid);
        assert!(!axes[0].visible);
        assert_eq!(axes[0].side, AxisSide::Right);
        assert_eq!(axes[1].side, AxisSide::Right);
        assert_eq!(axes[2].side, AxisSide::Left);
        assert_eq!(axes[1].color, "#f87171");
        assert_eq!(axes[1].title, "Temp (°C)");
        assert_eq!(alloc.series()[2].axis_id, "y2");
    }

    #[test]
    fn test_no_grid_when_everything_hidden() {
        let mut alloc = allocator(&[Metric::Humidity, Metric::Temperature]);
        alloc.seed(&[false, false]);
        alloc.rebalance();
        let axes = alloc.normalize_axes();
        assert!(axes.iter().all(|a| !a.draws_grid && !a.visible));
    }
}
