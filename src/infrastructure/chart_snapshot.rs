// Chart snapshot - keeps the last pushed chart configuration for clients to poll
use crate::application::chart_updater::{ChartConfig, ChartRenderer};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    pub config: ChartConfig,
    pub revision: u64,
    pub last_animated: bool,
}

impl ChartRenderer for ChartSnapshot {
    fn configure(&mut self, config: ChartConfig) {
        self.config = config;
    }

    fn redraw(&mut self, animate: bool) {
        self.revision += 1;
        self.last_animated = animate;
    }
}
