// Position engine - dead reckoning from discrete move/rotate commands
use crate::application::activity_sink::ActivitySink;
use crate::application::map_renderer::{DrawingSurface, MapRenderer};
use crate::application::settings_store::{SettingsStore, TRAIL_LIMIT_KEY};
use crate::domain::robot::{parse_trail_limit, round4, wrap_degrees, Pose, Trail};
use std::sync::Arc;

pub trait PositionEngine {
    /// Advances `step` world units along the current heading.
    fn move_by(&mut self, step: f64);

    /// Turns clockwise by `delta_deg`, keeping the heading in [0, 360).
    fn rotate(&mut self, delta_deg: f64);

    /// Origin, facing north, trail holding only the origin.
    fn reset(&mut self);

    /// Clamps to >= 1, evicts the oldest trail points and persists. Returns the stored limit.
    fn set_trail_limit(&mut self, limit: i64) -> usize;

    fn pose(&self) -> Pose;

    fn trail(&self) -> &Trail;
}

pub struct DeadReckoningEngine<S: DrawingSurface> {
    pose: Pose,
    trail: Trail,
    surface: Option<S>,
    settings: Arc<dyn SettingsStore>,
    activity: Arc<dyn ActivitySink>,
}

impl<S: DrawingSurface> DeadReckoningEngine<S> {
    /// Starts at the origin with the persisted trail limit, or `default_limit`.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        activity: Arc<dyn ActivitySink>,
        default_limit: usize,
    ) -> Self {
        let limit = settings
            .get(TRAIL_LIMIT_KEY)
            .map(|saved| parse_trail_limit(&saved, default_limit))
            .unwrap_or(default_limit);

        Self {
            pose: Pose::origin(),
            trail: Trail::new(limit),
            surface: None,
            settings,
            activity,
        }
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
        self.render();
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Applies `f` to the surface (e.g. a resize) and repaints.
    pub fn update_surface(&mut self, f: impl FnOnce(&mut S)) {
        match self.surface.as_mut() {
            Some(surface) => {
                f(surface);
                self.render();
            }
            None => tracing::warn!("Robot map surface unavailable, ignoring surface update"),
        }
    }

    pub fn readout(&self) -> String {
        self.pose.readout()
    }

    fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            tracing::warn!("Robot map surface unavailable, skipping render");
            return;
        };
        MapRenderer::render(&self.pose, &self.trail, surface);
    }
}

impl<S: DrawingSurface> PositionEngine for DeadReckoningEngine<S> {
    fn move_by(&mut self, step: f64) {
        if !step.is_finite() {
            tracing::warn!("Ignoring non-finite move step {}", step);
            return;
        }

        let rad = self.pose.angle_deg.to_radians();
        // x grows east (sin), y grows north (cos)
        let dx = rad.sin() * step;
        let dy = rad.cos() * step;
        self.pose.x = round4(self.pose.x + dx);
        self.pose.y = round4(self.pose.y + dy);
        self.trail.push(self.pose.point());

        let direction = if step > 0.0 { "forward" } else { "backward" };
        self.activity.log(&format!(
            "Robot moved {} to ({:.2}, {:.2})",
            direction, self.pose.x, self.pose.y
        ));
        tracing::debug!(pose = ?self.pose, trail_len = self.trail.len(), "robot moved");
        self.render();
    }

    fn rotate(&mut self, delta_deg: f64) {
        if !delta_deg.is_finite() {
            tracing::warn!("Ignoring non-finite rotation {}", delta_deg);
            return;
        }

        self.pose.angle_deg = wrap_degrees(self.pose.angle_deg + delta_deg);

        let direction = if delta_deg > 0.0 { "right" } else { "left" };
        self.activity.log(&format!(
            "Robot rotated {} to {:.0}°",
            direction, self.pose.angle_deg
        ));
        tracing::debug!(angle = self.pose.angle_deg, "{}", self.readout());
        self.render();
    }

    fn reset(&mut self) {
        self.pose = Pose::origin();
        self.trail.reset();
        self.activity.log("Robot position reset");
        self.render();
    }

    fn set_trail_limit(&mut self, limit: i64) -> usize {
        let requested = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
        let stored = self.trail.set_limit(requested);
        self.settings.set(TRAIL_LIMIT_KEY, &stored.to_string());
        self.activity.log(&format!("Trail limit set to {}", stored));
        self.render();
        stored
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn trail(&self) -> &Trail {
        &self.trail
    }
}
