// Recording doubles for the drawing surface, chart renderer and activity sink
use crate::application::activity_sink::{ActivitySink, Severity};
use crate::application::chart_updater::{ChartConfig, ChartRenderer};
use crate::application::map_renderer::{DrawingSurface, SurfaceSize};
use crate::application::dashboard_session::{DashboardSession, SessionOptions};
use crate::application::sensor_repository::SensorRepository;
use crate::application::sensor_service::SensorService;
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::chart_snapshot::ChartSnapshot;
use crate::infrastructure::mock_sensor_repository::MockSensorRepository;
use crate::infrastructure::settings::MemorySettings;
use crate::infrastructure::svg_surface::SvgSurface;
use crate::presentation::app_state::AppState;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Rect,
    Segments(usize),
    Polyline { points: Vec<(f64, f64)> },
    Polygon(Vec<(f64, f64)>),
    Circle { center: (f64, f64), radius: f64 },
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
}

pub struct RecordingSurface {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64, pixel_density: f64) -> Self {
        Self {
            size: SurfaceSize {
                width,
                height,
                pixel_density,
            },
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Commands of the most recent frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
    }

    fn fill_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64, _color: &str) {
        self.commands.push(DrawCommand::Rect);
    }

    fn stroke_segments(&mut self, segments: &[[(f64, f64); 2]], _color: &str, _line_width: f64) {
        self.commands.push(DrawCommand::Segments(segments.len()));
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], _color: &str, _line_width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
        });
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], _color: &str) {
        self.commands.push(DrawCommand::Polygon(points.to_vec()));
    }

    fn fill_circle(&mut self, center: (f64, f64), radius: f64, _color: &str) {
        self.commands.push(DrawCommand::Circle { center, radius });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.commands.push(DrawCommand::Rotate(radians));
    }
}

#[derive(Default)]
pub struct RecordingChart {
    pub last: Option<ChartConfig>,
    pub redraws: Vec<bool>,
}

impl ChartRenderer for RecordingChart {
    fn configure(&mut self, config: ChartConfig) {
        self.last = Some(config);
    }

    fn redraw(&mut self, animate: bool) {
        self.redraws.push(animate);
    }
}

#[derive(Default)]
pub struct RecordingActivity {
    lines: Mutex<Vec<String>>,
    alerts: Mutex<Vec<(String, Severity)>>,
}

impl RecordingActivity {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<(String, Severity)> {
        self.alerts.lock().unwrap().clone()
    }
}

impl ActivitySink for RecordingActivity {
    fn log(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn alert(&self, text: &str, severity: Severity) {
        self.alerts.lock().unwrap().push((text.to_string(), severity));
    }
}

/// Fully wired state over the mock repository and in-memory settings.
pub fn app_state() -> Arc<AppState> {
    app_state_with(Arc::new(MockSensorRepository::new()))
}

pub fn app_state_with(repository: Arc<dyn SensorRepository>) -> Arc<AppState> {
    let activity = Arc::new(ActivityLog::new());
    let session = DashboardSession::new(
        SessionOptions::default(),
        Arc::new(MemorySettings::new()),
        activity.clone(),
        Some(SvgSurface::new(400.0, 240.0, 1.0)),
        Some(ChartSnapshot::default()),
    );
    Arc::new(AppState {
        sensor_service: SensorService::new(repository),
        session: Arc::new(tokio::sync::Mutex::new(session)),
        activity,
        device_ip: None,
        history_limit: 100,
    })
}
